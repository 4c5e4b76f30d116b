//! Per-player session records.
//!
//! One [`Session`] exists per connected human, created on connect and
//! discarded on disconnect. The session is the source of truth for the
//! player's active drill, progress, owned bots and settings.

use crate::host::{EntityId, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub mod compat;

/// How the player is healed during a drill. Discriminants are the wire
/// values used by the difficulty menu and `default_cfg.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealingMethod {
    /// No healing at all.
    None = 0,
    /// Start each run with 500 HP, no per-kill healing.
    InitialOnly = 1,
    /// +25 HP per counted kill.
    Modest = 2,
    /// +100 HP per counted kill.
    Standard = 3,
    /// Start with 500 HP and +500 HP per counted kill.
    Generous = 4,
}

impl Default for HealingMethod {
    fn default() -> Self {
        HealingMethod::Standard
    }
}

impl HealingMethod {
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(HealingMethod::None),
            1 => Some(HealingMethod::InitialOnly),
            2 => Some(HealingMethod::Modest),
            3 => Some(HealingMethod::Standard),
            4 => Some(HealingMethod::Generous),
            _ => None,
        }
    }

    /// Health the player is set to when a run starts, if any.
    pub fn initial_health(self) -> Option<i32> {
        match self {
            HealingMethod::InitialOnly | HealingMethod::Generous => Some(500),
            _ => None,
        }
    }

    /// Health granted per counted kill, if any.
    pub fn kill_bonus(self) -> Option<i32> {
        match self {
            HealingMethod::Modest => Some(25),
            HealingMethod::Generous => Some(500),
            HealingMethod::Standard => Some(100),
            HealingMethod::None | HealingMethod::InitialOnly => None,
        }
    }
}

/// Which targets of a practice one run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingMode {
    /// A random subset of the targets (up to 7), original order preserved.
    RandomSubset = 0,
    /// Every target, in declaration order.
    Full = 1,
}

impl Default for TrainingMode {
    fn default() -> Self {
        TrainingMode::RandomSubset
    }
}

impl TrainingMode {
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(TrainingMode::RandomSubset),
            1 => Some(TrainingMode::Full),
            _ => None,
        }
    }
}

/// Weapon forced onto practice bots. `Random` leaves the host's default
/// bot loadout untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotWeapon {
    Random = 0,
    Ump45 = 1,
    Ak47 = 2,
    Ssg08 = 3,
    Awp = 4,
}

impl Default for BotWeapon {
    fn default() -> Self {
        BotWeapon::Random
    }
}

impl BotWeapon {
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(BotWeapon::Random),
            1 => Some(BotWeapon::Ump45),
            2 => Some(BotWeapon::Ak47),
            3 => Some(BotWeapon::Ssg08),
            4 => Some(BotWeapon::Awp),
            _ => None,
        }
    }

    /// Host item name to give, or `None` for the default loadout.
    pub fn item_name(self) -> Option<&'static str> {
        match self {
            BotWeapon::Random => None,
            BotWeapon::Ump45 => Some("weapon_ump45"),
            BotWeapon::Ak47 => Some("weapon_ak47"),
            BotWeapon::Ssg08 => Some("weapon_ssg08"),
            BotWeapon::Awp => Some("weapon_awp"),
        }
    }

    /// Untranslated display label; `None` for the localized "random" label.
    pub fn display_name(self) -> Option<&'static str> {
        match self {
            BotWeapon::Random => None,
            BotWeapon::Ump45 => Some("UMP-45"),
            BotWeapon::Ak47 => Some("AK47"),
            BotWeapon::Ssg08 => Some("SSG08"),
            BotWeapon::Awp => Some("AWP"),
        }
    }
}

/// Per-player drill settings. Persist across drills; only discarded on
/// disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub healing_method: HealingMethod,
    pub training_mode: TrainingMode,
    pub bot_weapon: BotWeapon,
}

/// A connected player's practice state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Index into the current map's practice list; -1 means no active drill.
    pub practice_index: i32,
    /// Targets already presented this run.
    pub progress: usize,
    /// Ordered target indices selected for this run.
    pub enabled_targets: Vec<usize>,
    /// Bot entities currently assigned to this session.
    pub bots: HashSet<EntityId>,
    pub settings: PlayerSettings,
    /// Guide-line beam entities drawn for the active drill.
    pub beams: Vec<EntityId>,
    /// Menu label tables, rebuilt each time the matching menu opens.
    pub localized_practice_names: HashMap<String, usize>,
    pub localized_difficulty_names: HashMap<String, usize>,
    pub localized_mode_names: HashMap<String, usize>,
}

impl Session {
    pub fn new(settings: PlayerSettings) -> Self {
        Self { practice_index: -1, settings, ..Self::default() }
    }

    pub fn is_active(&self) -> bool {
        self.practice_index != -1
    }
}

/// Owner of all [`Session`] records, keyed by stable player identity.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<PlayerId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with the given defaults. Silently keeps the existing
    /// record if the player is already tracked.
    pub fn add_player(&mut self, id: PlayerId, defaults: PlayerSettings) {
        self.sessions.entry(id).or_insert_with(|| Session::new(defaults));
    }

    /// Discard the record. The caller must have force-ended any active drill
    /// beforehand.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn is_active(&self, id: PlayerId) -> bool {
        self.sessions.get(&id).map(|s| s.is_active()).unwrap_or(false)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &Session)> {
        self.sessions.iter()
    }

    /// Number of sessions with an active drill. Cross-checks the environment
    /// reference count in tests.
    pub fn active_count(&self) -> usize {
        self.sessions.values().filter(|s| s.is_active()).count()
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}
