//! Menu construction and dispatch.
//!
//! Every menu is a list of localized labels; the host reports the chosen
//! label back and it is resolved to a [`MenuCommand`] through the label
//! tables rebuilt when the menu opened.

use super::PracticeOrchestrator;
use crate::error::PracticeError;
use crate::host::{HostEngine, PlayerId};
use crate::menu::{MenuCommand, MenuKind, MenuPresenter, BOT_WEAPON_LABELS, LANGUAGE_CHOICES};
use crate::session::{BotWeapon, HealingMethod, TrainingMode};
use fluent::fluent_args;
use std::collections::HashMap;

/// Main-menu entries: message key → command.
const MAIN_MENU_ENTRIES: &[(&str, MenuCommand)] = &[
    ("mainmenu-practice", MenuCommand::OpenPracticeMenu),
    ("mainmenu-map", MenuCommand::OpenMapMenu),
    ("mainmenu-difficulty", MenuCommand::OpenDifficultyMenu),
    ("mainmenu-mode", MenuCommand::OpenModeMenu),
    ("mainmenu-botweapon", MenuCommand::OpenBotWeaponMenu),
    ("mainmenu-language", MenuCommand::OpenLanguageMenu),
    ("mainmenu-stop", MenuCommand::StopPractice),
];

impl<H: HostEngine, M: MenuPresenter> PracticeOrchestrator<H, M> {
    pub fn open_main_menu(&mut self, player: PlayerId) {
        let title = self.translator.translate(player, "mainmenu-title", None);
        let mut options: Vec<String> = MAIN_MENU_ENTRIES
            .iter()
            .map(|(key, _)| self.translator.translate(player, key, None))
            .collect();
        options.push(self.close_label(player));
        self.presenter.open_menu(player, MenuKind::Main, &title, &options);
    }

    /// Practice menu: every startable practice, plus the player's current
    /// one so it can be restarted.
    pub fn open_practice_menu(&mut self, player: PlayerId) {
        if !self.sessions.contains(player) {
            return;
        }

        let mut table = HashMap::new();
        let mut options = Vec::new();
        for index in 0..self.practices.len() {
            if self.guard.can_start(index) {
                let label =
                    self.translator.practice_name(player, &self.map_name, &self.practices[index].name);
                table.insert(label.clone(), index);
                options.push(label);
            }
        }

        let current = self.sessions.get(player).map(|s| s.practice_index).unwrap_or(-1);
        if current > -1 && (current as usize) < self.practices.len() {
            let label = self
                .translator
                .practice_name(player, &self.map_name, &self.practices[current as usize].name);
            if table.insert(label.clone(), current as usize).is_none() {
                options.push(label);
            }
        }

        options.push(self.close_label(player));
        if let Some(session) = self.sessions.get_mut(player) {
            session.localized_practice_names = table;
        }

        let title = self.translator.translate(player, "practicemenu-title", None);
        self.presenter.open_menu(player, MenuKind::Practice, &title, &options);
    }

    pub fn open_map_menu(&mut self, player: PlayerId) {
        let title = self.translator.translate(player, "mapmenu-title", None);
        let mut options = self.available_maps.clone();
        options.push(self.close_label(player));
        self.presenter.open_menu(player, MenuKind::Map, &title, &options);
    }

    pub fn open_difficulty_menu(&mut self, player: PlayerId) {
        if !self.sessions.contains(player) {
            return;
        }

        let mut table = HashMap::new();
        let mut options = Vec::new();
        for index in 0..5 {
            let label = self.translator.translate(player, &format!("difficulty-{}", index), None);
            table.insert(label.clone(), index);
            options.push(label);
        }
        options.push(self.close_label(player));

        if let Some(session) = self.sessions.get_mut(player) {
            session.localized_difficulty_names = table;
        }

        let title = self.translator.translate(player, "difficulty-title", None);
        self.presenter.open_menu(player, MenuKind::Difficulty, &title, &options);
    }

    pub fn open_mode_menu(&mut self, player: PlayerId) {
        if !self.sessions.contains(player) {
            return;
        }

        let mut table = HashMap::new();
        let mut options = Vec::new();
        for index in 0..2 {
            let label = self.translator.translate(player, &format!("modemenu-{}", index), None);
            table.insert(label.clone(), index);
            options.push(label);
        }
        options.push(self.close_label(player));

        if let Some(session) = self.sessions.get_mut(player) {
            session.localized_mode_names = table;
        }

        let title = self.translator.translate(player, "modemenu-title", None);
        self.presenter.open_menu(player, MenuKind::Mode, &title, &options);
    }

    pub fn open_bot_weapon_menu(&mut self, player: PlayerId) {
        let title = self.translator.translate(player, "weaponmenu-title", None);
        let mut options = vec![self.translator.translate(player, "weaponmenu-random", None)];
        options.extend(BOT_WEAPON_LABELS.iter().map(|l| l.to_string()));
        options.push(self.close_label(player));
        self.presenter.open_menu(player, MenuKind::BotWeapon, &title, &options);
    }

    pub fn open_language_menu(&mut self, player: PlayerId) {
        // Deliberately untranslated: the player may not read the current
        // language.
        let title = "Change language settings";
        let mut options: Vec<String> =
            LANGUAGE_CHOICES.iter().map(|(label, _)| label.to_string()).collect();
        options.push(self.close_label(player));
        self.presenter.open_menu(player, MenuKind::Language, title, &options);
    }

    /// Host callback: the player picked `label` in a menu of `kind`.
    pub fn on_menu_select(&mut self, player: PlayerId, kind: MenuKind, label: &str) {
        let Some(command) = self.resolve_menu_choice(player, kind, label) else {
            log::debug!("unresolvable menu choice {:?} / {}", kind, label);
            return;
        };
        self.dispatch_menu_command(player, command);
    }

    /// Map a chosen label back to a command via the per-session tables.
    fn resolve_menu_choice(
        &self,
        player: PlayerId,
        kind: MenuKind,
        label: &str,
    ) -> Option<MenuCommand> {
        if label == self.close_label(player) {
            return Some(MenuCommand::Close);
        }

        match kind {
            MenuKind::Main => MAIN_MENU_ENTRIES
                .iter()
                .find(|(key, _)| self.translator.translate(player, key, None) == label)
                .map(|(_, command)| command.clone()),

            MenuKind::Practice => self
                .sessions
                .get(player)?
                .localized_practice_names
                .get(label)
                .map(|&index| MenuCommand::SelectPractice(index)),

            MenuKind::Map => self
                .available_maps
                .iter()
                .any(|m| m == label)
                .then(|| MenuCommand::SelectMap(label.to_string())),

            MenuKind::Difficulty => self
                .sessions
                .get(player)?
                .localized_difficulty_names
                .get(label)
                .map(|&index| MenuCommand::SelectDifficulty(index)),

            MenuKind::Mode => self
                .sessions
                .get(player)?
                .localized_mode_names
                .get(label)
                .map(|&index| MenuCommand::SelectMode(index)),

            MenuKind::BotWeapon => {
                if let Some(position) = BOT_WEAPON_LABELS.iter().position(|&l| l == label) {
                    Some(MenuCommand::SelectBotWeapon(position + 1))
                } else {
                    Some(MenuCommand::SelectBotWeapon(0))
                }
            }

            MenuKind::Language => {
                let culture = LANGUAGE_CHOICES
                    .iter()
                    .find(|(choice, _)| *choice == label)
                    .map(|(_, culture)| *culture)
                    .unwrap_or("en");
                Some(MenuCommand::SelectLanguage(culture.to_string()))
            }
        }
    }

    /// Single dispatch point for every resolved menu command.
    fn dispatch_menu_command(&mut self, player: PlayerId, command: MenuCommand) {
        match command {
            MenuCommand::OpenPracticeMenu => self.open_practice_menu(player),
            MenuCommand::OpenMapMenu => self.open_map_menu(player),
            MenuCommand::OpenDifficultyMenu => self.open_difficulty_menu(player),
            MenuCommand::OpenModeMenu => self.open_mode_menu(player),
            MenuCommand::OpenBotWeaponMenu => self.open_bot_weapon_menu(player),
            MenuCommand::OpenLanguageMenu => self.open_language_menu(player),

            MenuCommand::StopPractice => {
                self.force_stop_practice(player);
                self.close_current_menu(player);
            }

            MenuCommand::SelectPractice(index) => {
                if let Err(err) = self.start_practice(player, index) {
                    self.report_start_error(player, err);
                }
                self.close_current_menu(player);
            }

            MenuCommand::SelectMap(map) => self.change_map(player, &map),

            MenuCommand::SelectDifficulty(index) => {
                if let Some(method) = HealingMethod::from_index(index as i32) {
                    self.change_difficulty(player, method);
                }
                self.close_current_menu(player);
            }

            MenuCommand::SelectMode(index) => {
                if let Some(mode) = TrainingMode::from_index(index as i32) {
                    self.change_training_mode(player, mode);
                }
                self.close_current_menu(player);
            }

            MenuCommand::SelectBotWeapon(index) => {
                if let Some(weapon) = BotWeapon::from_index(index as i32) {
                    self.set_bot_weapon(player, weapon);
                }
                self.close_current_menu(player);
            }

            MenuCommand::SelectLanguage(culture) => {
                self.set_language(player, &culture);
                self.close_current_menu(player);
            }

            MenuCommand::Close => self.close_current_menu(player),
        }
    }

    fn close_current_menu(&mut self, player: PlayerId) {
        self.presenter.close_menu(player);
        self.chat_key(player, "mainmenu-menu-closed", None);
    }

    fn close_label(&self, player: PlayerId) -> String {
        self.translator.translate(player, "mainmenu-close-menu", None)
    }

    /// Chat feedback for a rejected practice start.
    pub(crate) fn report_start_error(&mut self, player: PlayerId, error: PracticeError) {
        match error {
            PracticeError::Incompatible(_) => self.chat_key(player, "practice-incompatible", None),
            PracticeError::NoTargets(_) => self.chat_key(player, "practice-no-targets", None),
            PracticeError::UnknownPractice { count, .. } => self.chat_key(
                player,
                "practice-help",
                Some(&fluent_args!["count" => count as i64]),
            ),
            other => log::warn!("practice start failed: {}", other),
        }
    }
}
