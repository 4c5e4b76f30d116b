//! In-memory host double for tests.

use super::{EntityId, HostEngine, PlayerId, Pose, SettingKind, SettingValue, Team, Vec3};
use std::collections::HashMap;

/// A recorded host-side command, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    AddBot(Team),
    KickBot(EntityId),
    Slay(EntityId),
    Respawn(EntityId),
    Teleport(EntityId, Pose),
    SetCrouching(EntityId, bool),
    Freeze(EntityId),
    StripWeapons(EntityId),
    GiveItem(EntityId, String),
    SetHealth(EntityId, i32),
    SetMoney(EntityId, i32),
    SetBotCombatRange(EntityId, u32),
    SetWeaponAmmo(EntityId, i32, i32),
    ExecClientCommand(EntityId, String),
    WriteSetting(String, String),
    StartWarmup,
    EndWarmup,
    KickAllBots,
    SpawnBeam,
    RemoveEntity(EntityId),
    EntityInput(EntityId, String),
    ChangeLevel(String),
}

#[derive(Debug, Clone, Default)]
pub struct FakeEntity {
    pub is_bot: bool,
    pub valid: bool,
    pub alive: bool,
    pub player: Option<PlayerId>,
    pub team: Option<Team>,
    pub language: Option<String>,
    pub weapons: Vec<(EntityId, String)>,
    pub class_name: Option<String>,
    pub health: i32,
}

/// Scriptable [`HostEngine`] implementation that records every command.
#[derive(Debug, Default)]
pub struct FakeHost {
    next_entity: u32,
    pub entities: HashMap<EntityId, FakeEntity>,
    pub settings: HashMap<String, SettingValue>,
    /// `None` makes the warmup query fail, exercising the fail-open path.
    pub warmup: Option<bool>,
    pub map: String,
    pub commands: Vec<HostCommand>,
    pub chat: Vec<(PlayerId, String)>,
    pub center: Vec<(PlayerId, String)>,
}

impl FakeHost {
    pub fn new(map: &str) -> Self {
        Self { map: map.to_string(), warmup: Some(false), ..Self::default() }
    }

    fn alloc(&mut self) -> EntityId {
        self.next_entity += 1;
        EntityId(self.next_entity)
    }

    /// Register a connected human and return its entity handle.
    pub fn connect_human(&mut self, account: u64, team: Team) -> EntityId {
        let id = self.alloc();
        self.entities.insert(
            id,
            FakeEntity {
                valid: true,
                alive: true,
                player: Some(PlayerId(account)),
                team: Some(team),
                health: 100,
                ..FakeEntity::default()
            },
        );
        id
    }

    /// Materialize one bot, as the server would after an `add_bot` request.
    pub fn create_bot(&mut self, team: Team) -> EntityId {
        let id = self.alloc();
        self.entities.insert(
            id,
            FakeEntity {
                is_bot: true,
                valid: true,
                alive: true,
                team: Some(team),
                health: 100,
                ..FakeEntity::default()
            },
        );
        id
    }

    /// Register a world entity with a class name (for the breakables pass).
    pub fn add_world_entity(&mut self, class_name: &str) -> EntityId {
        let id = self.alloc();
        self.entities.insert(
            id,
            FakeEntity {
                valid: true,
                class_name: Some(class_name.to_string()),
                ..FakeEntity::default()
            },
        );
        id
    }

    pub fn set_alive(&mut self, entity: EntityId, alive: bool) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.alive = alive;
        }
    }

    pub fn invalidate(&mut self, entity: EntityId) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.valid = false;
            e.alive = false;
        }
    }

    /// Items given to `entity`, in order.
    pub fn items_given(&self, entity: EntityId) -> Vec<String> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                HostCommand::GiveItem(e, item) if *e == entity => Some(item.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&HostCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl HostEngine for FakeHost {
    fn is_valid(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).map(|e| e.valid).unwrap_or(false)
    }

    fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).map(|e| e.valid && e.alive).unwrap_or(false)
    }

    fn is_bot(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).map(|e| e.is_bot).unwrap_or(false)
    }

    fn player_id_of(&self, entity: EntityId) -> Option<PlayerId> {
        self.entities.get(&entity).and_then(|e| e.player)
    }

    fn entity_of(&self, player: PlayerId) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|(_, e)| e.valid && e.player == Some(player))
            .map(|(id, _)| *id)
    }

    fn team_of(&self, entity: EntityId) -> Option<Team> {
        self.entities.get(&entity).and_then(|e| e.team)
    }

    fn health_of(&self, entity: EntityId) -> Option<i32> {
        self.entities.get(&entity).filter(|e| e.valid).map(|e| e.health)
    }

    fn connected_players(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| e.valid && !e.is_bot && e.player.is_some())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    fn client_language(&self, player: PlayerId) -> Option<String> {
        self.entities
            .values()
            .find(|e| e.player == Some(player))
            .and_then(|e| e.language.clone())
    }

    fn map_name(&self) -> String {
        self.map.clone()
    }

    fn read_setting(&self, name: &str, _kind: SettingKind) -> Result<SettingValue, String> {
        self.settings.get(name).cloned().ok_or_else(|| format!("unknown setting {}", name))
    }

    fn warmup_active(&self) -> Result<bool, String> {
        self.warmup.ok_or_else(|| "game rules unavailable".to_string())
    }

    fn weapons_of(&self, entity: EntityId) -> Vec<(EntityId, String)> {
        self.entities.get(&entity).map(|e| e.weapons.clone()).unwrap_or_default()
    }

    fn entities_by_class(&self, class_name: &str) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| e.valid && e.class_name.as_deref() == Some(class_name))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    fn add_bot(&mut self, team: Team) {
        self.commands.push(HostCommand::AddBot(team));
    }

    fn kick_bot(&mut self, entity: EntityId) {
        self.invalidate(entity);
        self.commands.push(HostCommand::KickBot(entity));
    }

    fn slay(&mut self, entity: EntityId) {
        self.set_alive(entity, false);
        self.commands.push(HostCommand::Slay(entity));
    }

    fn respawn(&mut self, entity: EntityId) {
        self.set_alive(entity, true);
        self.commands.push(HostCommand::Respawn(entity));
    }

    fn teleport(&mut self, entity: EntityId, pose: &Pose) {
        self.commands.push(HostCommand::Teleport(entity, *pose));
    }

    fn set_crouching(&mut self, entity: EntityId, crouch: bool) {
        self.commands.push(HostCommand::SetCrouching(entity, crouch));
    }

    fn freeze(&mut self, entity: EntityId) {
        self.commands.push(HostCommand::Freeze(entity));
    }

    fn strip_weapons(&mut self, entity: EntityId) {
        self.commands.push(HostCommand::StripWeapons(entity));
    }

    fn give_item(&mut self, entity: EntityId, item: &str) {
        self.commands.push(HostCommand::GiveItem(entity, item.to_string()));
    }

    fn set_health(&mut self, entity: EntityId, health: i32) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.health = health;
        }
        self.commands.push(HostCommand::SetHealth(entity, health));
    }

    fn set_money(&mut self, entity: EntityId, money: i32) {
        self.commands.push(HostCommand::SetMoney(entity, money));
    }

    fn set_bot_combat_range(&mut self, entity: EntityId, range: u32) {
        self.commands.push(HostCommand::SetBotCombatRange(entity, range));
    }

    fn set_weapon_ammo(&mut self, weapon: EntityId, clip: i32, reserve: i32) {
        self.commands.push(HostCommand::SetWeaponAmmo(weapon, clip, reserve));
    }

    fn exec_client_command(&mut self, entity: EntityId, command: &str) {
        self.commands.push(HostCommand::ExecClientCommand(entity, command.to_string()));
    }

    fn write_setting(&mut self, name: &str, value: &SettingValue) {
        self.settings.insert(name.to_string(), value.clone());
        self.commands.push(HostCommand::WriteSetting(name.to_string(), value.to_string()));
    }

    fn start_warmup(&mut self) {
        self.commands.push(HostCommand::StartWarmup);
    }

    fn end_warmup(&mut self) {
        self.commands.push(HostCommand::EndWarmup);
    }

    fn kick_all_bots(&mut self) {
        self.commands.push(HostCommand::KickAllBots);
    }

    fn spawn_beam(&mut self, _start: Vec3, _end: Vec3) -> Option<EntityId> {
        let id = self.alloc();
        self.entities.insert(
            id,
            FakeEntity { valid: true, class_name: Some("beam".to_string()), ..FakeEntity::default() },
        );
        self.commands.push(HostCommand::SpawnBeam);
        Some(id)
    }

    fn remove_entity(&mut self, entity: EntityId) {
        self.invalidate(entity);
        self.commands.push(HostCommand::RemoveEntity(entity));
    }

    fn entity_input(&mut self, entity: EntityId, input: &str) {
        self.commands.push(HostCommand::EntityInput(entity, input.to_string()));
    }

    fn print_chat(&mut self, player: PlayerId, text: &str) {
        self.chat.push((player, text.to_string()));
    }

    fn print_center(&mut self, player: PlayerId, text: &str) {
        self.center.push((player, text.to_string()));
    }

    fn change_level(&mut self, map: &str) {
        self.commands.push(HostCommand::ChangeLevel(map.to_string()));
    }
}
