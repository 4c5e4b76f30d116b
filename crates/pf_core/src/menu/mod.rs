//! Menu contracts.
//!
//! Menus are rendered by the host integration; the core only supplies
//! labeled choices and receives the chosen label back. Each choice resolves
//! to a tagged [`MenuCommand`], dispatched by one function per menu kind;
//! there are no per-option callbacks.

use crate::host::PlayerId;

/// Which menu a selection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuKind {
    Main,
    Practice,
    Map,
    Difficulty,
    Mode,
    BotWeapon,
    Language,
}

/// Resolved meaning of a menu selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    OpenPracticeMenu,
    OpenMapMenu,
    OpenDifficultyMenu,
    OpenModeMenu,
    OpenBotWeaponMenu,
    OpenLanguageMenu,
    StopPractice,
    SelectPractice(usize),
    SelectMap(String),
    SelectDifficulty(usize),
    SelectMode(usize),
    SelectBotWeapon(usize),
    SelectLanguage(String),
    Close,
}

/// Renders menus to players. Implemented by the host integration.
pub trait MenuPresenter {
    /// Show a menu with the given labeled choices. The host reports the
    /// player's pick through the orchestrator's `on_menu_select`.
    fn open_menu(&mut self, player: PlayerId, kind: MenuKind, title: &str, options: &[String]);
    /// Dismiss the player's active menu.
    fn close_menu(&mut self, player: PlayerId);
}

/// Fixed language choices: displayed label → culture code.
pub const LANGUAGE_CHOICES: &[(&str, &str)] =
    &[("English", "en"), ("Português", "pt-BR"), ("中文", "zh")];

/// Fixed bot-weapon labels in menu order; index is the wire value.
pub const BOT_WEAPON_LABELS: &[&str] = &["UMP-45", "AK47", "SSG08", "AWP"];

/// Presenter for hosts without menu support; every call is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl MenuPresenter for NullPresenter {
    fn open_menu(&mut self, _: PlayerId, _: MenuKind, _: &str, _: &[String]) {}

    fn close_menu(&mut self, _: PlayerId) {}
}
