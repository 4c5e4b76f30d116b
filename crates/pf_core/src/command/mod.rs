//! Command-verb parsing.
//!
//! The host delivers the practice command pre-tokenized; this module maps
//! the verb and its argument to one core operation. Anything unrecognized
//! resolves to help text (plus the main menu for a bad verb, matching the
//! original chat command).

use crate::session::{BotWeapon, TrainingMode};

/// One deterministic core operation a command invocation maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    /// Bare command: show the main menu.
    OpenMainMenu,
    /// `prac <n>` with a plausible 1-based index; bounds are checked against
    /// the loaded practice list by the caller.
    StartPractice(usize),
    PracticeHelp,
    /// `map <name>`
    ChangeMap(String),
    /// `df <1..5>`, already converted to the healing-method index.
    SetDifficulty(i32),
    DifficultyHelp,
    /// `mode <full|rand>`
    SetMode(TrainingMode),
    ModeHelp,
    /// `bw <rand|ump|ak|sct|awp>`
    SetBotWeapon(BotWeapon),
    BotWeaponHelp,
    /// `lang <en|pt|zh>`
    SetLanguage(String),
    LanguageHelp,
    /// `exit`
    StopPractice,
    /// `help`
    Help,
    /// Unknown verb: help text, then the main menu.
    Unknown,
}

/// Map tokenized arguments (excluding the command name itself) to an action.
pub fn parse_command(args: &[&str]) -> CommandAction {
    let Some(&verb) = args.first() else {
        return CommandAction::OpenMainMenu;
    };
    let arg = args.get(1).copied();

    match verb {
        "prac" => match arg.and_then(|a| a.parse::<usize>().ok()) {
            Some(n) if n > 0 => CommandAction::StartPractice(n),
            _ => CommandAction::PracticeHelp,
        },
        "map" => match arg {
            Some(name) if !name.is_empty() => CommandAction::ChangeMap(name.to_string()),
            _ => CommandAction::Unknown,
        },
        "df" => match arg.and_then(|a| a.parse::<i32>().ok()) {
            // Difficulty 1 is the most forgiving; it maps to the highest
            // healing method.
            Some(n) if (1..=5).contains(&n) => CommandAction::SetDifficulty(5 - n),
            _ => CommandAction::DifficultyHelp,
        },
        "mode" => match arg {
            Some("full") => CommandAction::SetMode(TrainingMode::Full),
            Some("rand") => CommandAction::SetMode(TrainingMode::RandomSubset),
            _ => CommandAction::ModeHelp,
        },
        "bw" => match arg {
            Some("rand") => CommandAction::SetBotWeapon(BotWeapon::Random),
            Some("ump") => CommandAction::SetBotWeapon(BotWeapon::Ump45),
            Some("ak") => CommandAction::SetBotWeapon(BotWeapon::Ak47),
            Some("sct") => CommandAction::SetBotWeapon(BotWeapon::Ssg08),
            Some("awp") => CommandAction::SetBotWeapon(BotWeapon::Awp),
            _ => CommandAction::BotWeaponHelp,
        },
        "lang" => match arg {
            Some("en") => CommandAction::SetLanguage("en".to_string()),
            Some("pt") => CommandAction::SetLanguage("pt-BR".to_string()),
            Some("zh") => CommandAction::SetLanguage("zh".to_string()),
            _ => CommandAction::LanguageHelp,
        },
        "exit" => CommandAction::StopPractice,
        "help" => CommandAction::Help,
        _ => CommandAction::Unknown,
    }
}
