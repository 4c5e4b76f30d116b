//! Operator-provided default player settings.
//!
//! Server operators may drop a `default_cfg.json` next to the practice data
//! to change the settings new players start with. Missing files and
//! out-of-range fields fall back to the compiled defaults, field by field.

use crate::session::{BotWeapon, HealingMethod, PlayerSettings, TrainingMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raw shape of `default_cfg.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultConfig {
    pub difficulty: i32,
    pub training_mode: i32,
    pub bot_weapon: i32,
}

impl Default for DefaultConfig {
    fn default() -> Self {
        let settings = PlayerSettings::default();
        Self {
            difficulty: settings.healing_method as i32,
            training_mode: settings.training_mode as i32,
            bot_weapon: settings.bot_weapon as i32,
        }
    }
}

impl DefaultConfig {
    /// Load defaults from `path`. Absent file or unparsable content falls
    /// back wholesale; out-of-range fields fall back individually.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("no default settings at {}, using compiled defaults", path.display());
            return Self::default();
        }

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("failed to read {}: {}", path.display(), err);
                return Self::default();
            }
        };

        match serde_json::from_str::<DefaultConfig>(&text) {
            Ok(raw) => {
                let cfg = raw.sanitized();
                log::info!(
                    "using default settings: difficulty={}, training_mode={}, bot_weapon={}",
                    cfg.difficulty,
                    cfg.training_mode,
                    cfg.bot_weapon
                );
                cfg
            }
            Err(err) => {
                log::warn!("failed to parse {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Replace out-of-range fields with the compiled defaults.
    fn sanitized(mut self) -> Self {
        let fallback = Self::default();
        if !(0..5).contains(&self.difficulty) {
            log::warn!("ignoring out-of-range difficulty {}", self.difficulty);
            self.difficulty = fallback.difficulty;
        }
        if !(0..2).contains(&self.training_mode) {
            log::warn!("ignoring out-of-range training mode {}", self.training_mode);
            self.training_mode = fallback.training_mode;
        }
        if !(0..5).contains(&self.bot_weapon) {
            log::warn!("ignoring out-of-range bot weapon {}", self.bot_weapon);
            self.bot_weapon = fallback.bot_weapon;
        }
        self
    }

    /// Settings a newly connected player starts with.
    pub fn player_settings(&self) -> PlayerSettings {
        PlayerSettings {
            healing_method: HealingMethod::from_index(self.difficulty)
                .unwrap_or_default(),
            training_mode: TrainingMode::from_index(self.training_mode)
                .unwrap_or_default(),
            bot_weapon: BotWeapon::from_index(self.bot_weapon).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DefaultConfig::load_or_default(&dir.path().join("default_cfg.json"));
        assert_eq!(cfg.difficulty, DefaultConfig::default().difficulty);
    }

    #[test]
    fn test_valid_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default_cfg.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"difficulty": 1, "training_mode": 1, "bot_weapon": 4}}"#).unwrap();

        let cfg = DefaultConfig::load_or_default(&path);
        assert_eq!(cfg.difficulty, 1);
        assert_eq!(cfg.training_mode, 1);
        assert_eq!(cfg.bot_weapon, 4);
        assert_eq!(cfg.player_settings().bot_weapon, BotWeapon::Awp);
    }

    #[test]
    fn test_out_of_range_fields_fall_back_individually() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default_cfg.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"difficulty": 9, "training_mode": 1, "bot_weapon": -2}}"#).unwrap();

        let cfg = DefaultConfig::load_or_default(&path);
        assert_eq!(cfg.difficulty, DefaultConfig::default().difficulty);
        assert_eq!(cfg.training_mode, 1);
        assert_eq!(cfg.bot_weapon, DefaultConfig::default().bot_weapon);
    }
}
