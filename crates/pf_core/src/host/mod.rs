//! Host engine interface.
//!
//! The orchestrator never talks to the game server directly; everything goes
//! through the [`HostEngine`] trait. Entity handles are opaque and may go
//! stale at any time, so validity is always re-queried at the point of use.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a server entity (player controller, bot, beam, prop).
///
/// Handles are only meaningful to the host and carry no liveness guarantee;
/// callers must re-check [`HostEngine::is_valid`] before acting on one that
/// was cached across a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable identity of a human participant (account id). Survives map changes
/// and reconnects, unlike [`EntityId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// World position in engine units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// View angles (pitch, yaw, roll) in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// A placement pose: where an entity stands and where it looks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Rotation,
}

/// Team sides of the host game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Team {
    Terrorist,
    CounterTerrorist,
}

impl Team {
    pub fn opposite(self) -> Self {
        match self {
            Team::Terrorist => Team::CounterTerrorist,
            Team::CounterTerrorist => Team::Terrorist,
        }
    }
}

/// Value kinds for global server settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Bool,
    Int,
    Float,
    Text,
}

/// A captured global-setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(v) => write!(f, "{}", *v as u8),
            SettingValue::Int(v) => write!(f, "{}", v),
            SettingValue::Float(v) => write!(f, "{}", v),
            SettingValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Lifecycle notifications delivered by the host event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// An entity (human or bot) entered the server.
    ClientPutInServer { entity: EntityId },
    /// A human participant left the server.
    PlayerDisconnect { entity: EntityId },
    /// An entity (human or bot) spawned into the world.
    PlayerSpawn { entity: EntityId },
    /// An entity (human or bot) died.
    PlayerDeath { entity: EntityId },
    /// The server changed to a new map.
    MapStart { map: String },
}

/// Everything the orchestrator requires of the host game engine.
///
/// Commands are fire-and-forget; notably [`HostEngine::add_bot`] is
/// asynchronous and acknowledged later through a
/// [`HostEvent::ClientPutInServer`] for the created bot.
pub trait HostEngine {
    // --- queries -----------------------------------------------------------

    /// Whether the handle still refers to a live entity slot.
    fn is_valid(&self, entity: EntityId) -> bool;
    /// Whether the entity's pawn is currently alive.
    fn is_alive(&self, entity: EntityId) -> bool;
    /// Whether the entity is a bot controller.
    fn is_bot(&self, entity: EntityId) -> bool;
    /// Stable identity of a human entity; `None` for bots and stale handles.
    fn player_id_of(&self, entity: EntityId) -> Option<PlayerId>;
    /// Current entity of a connected human; `None` if not on the server.
    fn entity_of(&self, player: PlayerId) -> Option<EntityId>;
    /// Team the entity is on; `None` for spectators and stale handles.
    fn team_of(&self, entity: EntityId) -> Option<Team>;
    /// Current health of the entity's pawn; `None` for stale handles.
    fn health_of(&self, entity: EntityId) -> Option<i32>;
    /// Entities of all connected human participants.
    fn connected_players(&self) -> Vec<EntityId>;
    /// Preferred language tag reported by the client, e.g. `"pt"`.
    fn client_language(&self, player: PlayerId) -> Option<String>;
    /// Name of the currently running map.
    fn map_name(&self) -> String;
    /// Read a global setting by name and kind. Errors are reported as a
    /// plain message; the caller decides whether they are fatal.
    fn read_setting(&self, name: &str, kind: SettingKind) -> Result<SettingValue, String>;
    /// Whether the warmup period is currently active, per the game rules.
    fn warmup_active(&self) -> Result<bool, String>;
    /// Weapons currently held by the entity, as `(weapon, class name)`.
    fn weapons_of(&self, entity: EntityId) -> Vec<(EntityId, String)>;
    /// All entities whose designer/class name equals `class_name`.
    fn entities_by_class(&self, class_name: &str) -> Vec<EntityId>;

    // --- commands ----------------------------------------------------------

    /// Request creation of one bot on the given team. Asynchronous.
    fn add_bot(&mut self, team: Team);
    /// Kick a bot from the server.
    fn kick_bot(&mut self, entity: EntityId);
    /// Kill the entity's pawn without score side effects.
    fn slay(&mut self, entity: EntityId);
    /// Respawn a dead entity.
    fn respawn(&mut self, entity: EntityId);
    /// Teleport the entity's pawn to a pose.
    fn teleport(&mut self, entity: EntityId, pose: &Pose);
    /// Force the bot pawn into (or out of) a crouch.
    fn set_crouching(&mut self, entity: EntityId, crouch: bool);
    /// Pin the pawn in place by switching it to a non-simulated move type.
    fn freeze(&mut self, entity: EntityId);
    /// Remove every weapon the entity carries.
    fn strip_weapons(&mut self, entity: EntityId);
    /// Give a named item (weapon or gear) to the entity.
    fn give_item(&mut self, entity: EntityId, item: &str);
    /// Set the entity's current (and, above 100, max) health.
    fn set_health(&mut self, entity: EntityId, health: i32);
    /// Set the entity's money account.
    fn set_money(&mut self, entity: EntityId, money: i32);
    /// Raise the bot's engagement distance.
    fn set_bot_combat_range(&mut self, entity: EntityId, range: u32);
    /// Set a weapon's loaded magazine and reserve ammunition.
    fn set_weapon_ammo(&mut self, weapon: EntityId, clip: i32, reserve: i32);
    /// Run a client-side command in the entity's context (e.g. `slot1`).
    fn exec_client_command(&mut self, entity: EntityId, command: &str);
    /// Write a global setting by name.
    fn write_setting(&mut self, name: &str, value: &SettingValue);
    /// Force the warmup period to start.
    fn start_warmup(&mut self);
    /// End the warmup period.
    fn end_warmup(&mut self);
    /// Kick every bot on the server.
    fn kick_all_bots(&mut self);
    /// Spawn a rendered beam between two points. `None` on failure.
    fn spawn_beam(&mut self, start: Vec3, end: Vec3) -> Option<EntityId>;
    /// Remove an entity (e.g. a beam) from the world.
    fn remove_entity(&mut self, entity: EntityId);
    /// Fire a named input on an entity (e.g. `Break`, `Open`, `Kill`).
    fn entity_input(&mut self, entity: EntityId, input: &str);
    /// Print a line to the player's chat.
    fn print_chat(&mut self, player: PlayerId, text: &str);
    /// Print a message to the center of the player's screen.
    fn print_center(&mut self, player: PlayerId, text: &str);
    /// Change the server to another map.
    fn change_level(&mut self, map: &str);
}

#[cfg(test)]
pub mod fake;
