//! Command-surface dispatch.

use super::PracticeOrchestrator;
use crate::command::{parse_command, CommandAction};
use crate::host::{HostEngine, PlayerId};
use crate::menu::MenuPresenter;
use crate::session::HealingMethod;
use fluent::fluent_args;

impl<H: HostEngine, M: MenuPresenter> PracticeOrchestrator<H, M> {
    /// Handle one invocation of the practice command, already tokenized by
    /// the host (command name excluded).
    pub fn handle_command(&mut self, player: PlayerId, args: &[&str]) {
        if !self.sessions.contains(player) {
            log::debug!("command from untracked player {}", player);
            return;
        }

        let count = self.practices.len() as i64;
        match parse_command(args) {
            CommandAction::OpenMainMenu => self.open_main_menu(player),

            CommandAction::StartPractice(n) => {
                if n <= self.practices.len() {
                    if let Err(err) = self.start_practice(player, n - 1) {
                        self.report_start_error(player, err);
                    }
                } else {
                    self.chat_key(player, "practice-help", Some(&fluent_args!["count" => count]));
                }
            }
            CommandAction::PracticeHelp => {
                self.chat_key(player, "practice-help", Some(&fluent_args!["count" => count]));
            }

            CommandAction::ChangeMap(map) => self.change_map(player, &map),

            CommandAction::SetDifficulty(method) => {
                if let Some(method) = HealingMethod::from_index(method) {
                    self.change_difficulty(player, method);
                }
            }
            CommandAction::DifficultyHelp => self.chat_key(player, "difficulty-help", None),

            CommandAction::SetMode(mode) => self.change_training_mode(player, mode),
            CommandAction::ModeHelp => self.chat_key(player, "modemenu-help", None),

            CommandAction::SetBotWeapon(weapon) => self.set_bot_weapon(player, weapon),
            CommandAction::BotWeaponHelp => self.chat_key(player, "weaponmenu-help", None),

            CommandAction::SetLanguage(culture) => self.set_language(player, &culture),
            CommandAction::LanguageHelp => self.chat_key(player, "languagemenu-help", None),

            CommandAction::StopPractice => self.force_stop_practice(player),

            CommandAction::Help => {
                self.chat_key(player, "mainmenu-help", Some(&fluent_args!["count" => count]));
            }

            CommandAction::Unknown => {
                self.chat_key(player, "mainmenu-help", Some(&fluent_args!["count" => count]));
                self.open_main_menu(player);
            }
        }
    }
}
