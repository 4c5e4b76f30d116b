//! Global environment overlay.
//!
//! While any drill is active the server runs with a drill-appropriate set of
//! global settings. The first session to start captures the current values
//! and applies the overrides; the last session to end writes the captured
//! values back. Capture failures are fail-open: the drill still starts, the
//! unreadable entry is simply not restored later.

use crate::host::{EntityId, HostEngine, SettingKind, SettingValue};

/// Settings captured and restored around drill mode, by value kind.
const BOOL_SETTINGS: &[&str] = &[
    "tv_enable",
    "bot_allow_grenades",
    "bot_allow_shotguns",
    "mp_autoteambalance",
    "sv_alltalk",
    "sv_full_alltalk",
    "bot_allow_pistols",
    "bot_allow_rifles",
    "bot_allow_snipers",
];

const INT_SETTINGS: &[&str] = &[
    "mp_buy_anywhere",
    "mp_warmup_pausetimer",
    "mp_free_armor",
    "mp_limitteams",
    "mp_maxmoney",
    "mp_startmoney",
    "bot_difficulty",
    "custom_bot_difficulty",
    "mp_death_drop_gun",
    "mp_death_drop_grenade",
    "bot_quota",
];

const FLOAT_SETTINGS: &[&str] = &["mp_respawn_immunitytime", "mp_buytime"];

const STRING_SETTINGS: &[&str] = &["bot_quota_mode"];

/// Values written while drill mode is active.
const BOOL_OVERRIDES: &[(&str, bool)] = &[
    ("tv_enable", false),
    ("bot_allow_grenades", false),
    ("bot_allow_shotguns", false),
    ("mp_autoteambalance", false),
    ("sv_alltalk", true),
    ("sv_full_alltalk", true),
    ("bot_allow_pistols", true),
    ("bot_allow_rifles", true),
    ("bot_allow_snipers", true),
];

const INT_OVERRIDES: &[(&str, i64)] = &[
    ("mp_buy_anywhere", 1),
    ("mp_warmup_pausetimer", 1),
    ("mp_free_armor", 2),
    ("mp_limitteams", 0),
    ("mp_maxmoney", 60000),
    ("mp_startmoney", 60000),
    ("bot_difficulty", 5),
    ("custom_bot_difficulty", 5),
    ("mp_death_drop_gun", 0),
    ("mp_death_drop_grenade", 0),
    ("bot_quota", 0),
];

const FLOAT_OVERRIDES: &[(&str, f64)] = &[("mp_respawn_immunitytime", -1.0), ("mp_buytime", 9999.0)];

const STRING_OVERRIDES: &[(&str, &str)] = &[("bot_quota_mode", "normal")];

/// Captured pre-drill values, grouped by kind. Valid only while the
/// reference count is above zero.
#[derive(Debug, Default, Clone)]
pub struct EnvironmentSnapshot {
    bools: Vec<(String, bool)>,
    ints: Vec<(String, i64)>,
    floats: Vec<(String, f64)>,
    strings: Vec<(String, String)>,
    warmup_was_active: bool,
}

/// Reference-counted save/restore of the global server configuration.
///
/// The count tracks sessions with an active drill. Activation and
/// restoration are explicit so a drill switch (release immediately followed
/// by retain) keeps the overlay held without a spurious restore/recapture.
#[derive(Debug, Default)]
pub struct EnvironmentOverlay {
    active_sessions: usize,
    snapshot: Option<EnvironmentSnapshot>,
    /// Fallback when the warmup flag cannot be read at capture time.
    last_warmup: bool,
}

impl EnvironmentOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_sessions(&self) -> usize {
        self.active_sessions
    }

    /// Count a session in. Returns the new count.
    pub fn retain(&mut self) -> usize {
        self.active_sessions += 1;
        self.active_sessions
    }

    /// Count a session out. Returns the new count.
    pub fn release(&mut self) -> usize {
        self.active_sessions = self.active_sessions.saturating_sub(1);
        self.active_sessions
    }

    /// Capture the current server configuration and apply drill overrides.
    /// Called exactly when the count transitions 0→1.
    pub fn activate<H: HostEngine>(&mut self, host: &mut H) {
        let mut snapshot = EnvironmentSnapshot::default();

        for &name in BOOL_SETTINGS {
            match host.read_setting(name, SettingKind::Bool) {
                Ok(SettingValue::Bool(value)) => snapshot.bools.push((name.to_string(), value)),
                Ok(other) => log::warn!("setting {} read as unexpected kind {:?}", name, other),
                Err(err) => log::warn!("failed to read setting {}: {}", name, err),
            }
        }
        for &name in INT_SETTINGS {
            match host.read_setting(name, SettingKind::Int) {
                Ok(SettingValue::Int(value)) => snapshot.ints.push((name.to_string(), value)),
                Ok(other) => log::warn!("setting {} read as unexpected kind {:?}", name, other),
                Err(err) => log::warn!("failed to read setting {}: {}", name, err),
            }
        }
        for &name in FLOAT_SETTINGS {
            match host.read_setting(name, SettingKind::Float) {
                Ok(SettingValue::Float(value)) => snapshot.floats.push((name.to_string(), value)),
                Ok(other) => log::warn!("setting {} read as unexpected kind {:?}", name, other),
                Err(err) => log::warn!("failed to read setting {}: {}", name, err),
            }
        }
        for &name in STRING_SETTINGS {
            match host.read_setting(name, SettingKind::Text) {
                Ok(SettingValue::Text(value)) => snapshot.strings.push((name.to_string(), value)),
                Ok(other) => log::warn!("setting {} read as unexpected kind {:?}", name, other),
                Err(err) => log::warn!("failed to read setting {}: {}", name, err),
            }
        }

        match host.warmup_active() {
            Ok(active) => self.last_warmup = active,
            Err(err) => {
                log::warn!("can't read warmup status, keeping previous value {}: {}", self.last_warmup, err)
            }
        }
        snapshot.warmup_was_active = self.last_warmup;
        self.snapshot = Some(snapshot);
        log::info!("environment captured");

        for &(name, value) in BOOL_OVERRIDES {
            host.write_setting(name, &SettingValue::Bool(value));
        }
        for &(name, value) in INT_OVERRIDES {
            host.write_setting(name, &SettingValue::Int(value));
        }
        for &(name, value) in FLOAT_OVERRIDES {
            host.write_setting(name, &SettingValue::Float(value));
        }
        for &(name, value) in STRING_OVERRIDES {
            host.write_setting(name, &SettingValue::Text(value.to_string()));
        }

        host.start_warmup();
        host.kick_all_bots();
        log::info!("environment overrides applied");
    }

    /// Write back every captured value and drop the snapshot. Called exactly
    /// when the count transitions 1→0.
    pub fn deactivate<H: HostEngine>(&mut self, host: &mut H) {
        let Some(snapshot) = self.snapshot.take() else {
            log::warn!("deactivate without a captured environment");
            return;
        };

        for (name, value) in &snapshot.bools {
            host.write_setting(name, &SettingValue::Bool(*value));
        }
        for (name, value) in &snapshot.ints {
            host.write_setting(name, &SettingValue::Int(*value));
        }
        for (name, value) in &snapshot.floats {
            host.write_setting(name, &SettingValue::Float(*value));
        }
        for (name, value) in &snapshot.strings {
            host.write_setting(name, &SettingValue::Text(value.clone()));
        }

        if !snapshot.warmup_was_active {
            host.end_warmup();
        }
        log::info!("environment restored");
    }

    pub fn is_captured(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn clear(&mut self) {
        self.active_sessions = 0;
        self.snapshot = None;
        self.last_warmup = false;
    }
}

/// Geometry classes force-broken on maps where obstacles block drill routes.
const COMMON_BREAKABLES: &[&str] =
    &["func_breakable", "func_breakable_surf", "prop.breakable.01", "prop.breakable.02"];

/// Force-break/open map geometry relevant to drills. No-op on maps outside
/// the enabled set.
pub fn break_obstacles<H: HostEngine>(host: &mut H, map: &str) {
    // mirage is excluded: breaking its props crashes some server builds.
    if map != "de_nuke" {
        log::debug!("map {} has no breakables to break", map);
        return;
    }

    let mut targets: Vec<(EntityId, &str)> = Vec::new();
    for &class in COMMON_BREAKABLES {
        for entity in host.entities_by_class(class) {
            targets.push((entity, "Break"));
        }
    }
    for entity in host.entities_by_class("prop_dynamic") {
        targets.push((entity, "Break"));
    }
    for entity in host.entities_by_class("prop_door_rotating") {
        targets.push((entity, "Open"));
    }

    log::info!("breaking {} obstacles on {}", targets.len(), map);
    for (entity, input) in targets {
        host.entity_input(entity, input);
    }
}
