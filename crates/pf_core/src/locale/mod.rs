//! Player-facing message translation.
//!
//! Fluent (FTL) based. The orchestrator only ever emits message keys and
//! arguments; formatting happens here, per the culture recorded for each
//! player. Default resources for the supported cultures are embedded;
//! operators can override them with `.ftl` files on disk.

use crate::error::PracticeError;
use crate::host::PlayerId;
use fluent::{FluentArgs, FluentBundle, FluentMessage, FluentResource};
use fluent_langneg::{negotiate_languages, NegotiationStrategy};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use unic_langid::LanguageIdentifier;

/// Supported cultures, in preference order.
pub const SUPPORTED_CULTURES: &[&str] = &["en", "pt-BR", "zh"];

const EN_FTL: &str = include_str!("resources/en.ftl");
const PT_BR_FTL: &str = include_str!("resources/pt-BR.ftl");
const ZH_FTL: &str = include_str!("resources/zh.ftl");

static EMBEDDED_RESOURCES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut resources = HashMap::new();
    resources.insert("en", EN_FTL);
    resources.insert("pt-BR", PT_BR_FTL);
    resources.insert("zh", ZH_FTL);
    resources
});

/// Per-player message formatter.
pub struct Translator {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    player_cultures: HashMap<PlayerId, String>,
    default_culture: String,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    /// Build a translator with the embedded resources loaded.
    pub fn new() -> Self {
        let mut translator = Self {
            bundles: HashMap::new(),
            player_cultures: HashMap::new(),
            default_culture: "en".to_string(),
        };
        for (&culture, &content) in EMBEDDED_RESOURCES.iter() {
            if let Err(err) = translator.load_culture(culture, content) {
                log::error!("embedded resource for {} is invalid: {}", culture, err);
            }
        }
        translator
    }

    /// Load or replace one culture's resources.
    pub fn load_culture(&mut self, culture: &str, ftl_content: &str) -> Result<(), PracticeError> {
        let resource = FluentResource::try_new(ftl_content.to_string())
            .map_err(|_| PracticeError::Locale(format!("failed to parse FTL for {}", culture)))?;

        let lang_id: LanguageIdentifier = culture
            .parse()
            .map_err(|_| PracticeError::Locale(format!("invalid culture: {}", culture)))?;

        let mut bundle = FluentBundle::new(vec![lang_id]);
        // Game chat has no bidi context; keep the output free of isolation marks.
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|_| PracticeError::Locale(format!("conflicting messages in {}", culture)))?;

        self.bundles.insert(culture.to_string(), bundle);
        Ok(())
    }

    /// Load `<culture>.ftl` override files from a directory, one per
    /// supported culture. Missing files keep the embedded resources.
    pub fn load_overrides(&mut self, dir: &Path) -> Result<(), PracticeError> {
        for &culture in SUPPORTED_CULTURES {
            let path = dir.join(format!("{}.ftl", culture));
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                self.load_culture(culture, &content)?;
            }
        }
        Ok(())
    }

    /// Record the culture a newly connected player should get, negotiated
    /// from the language tag their client reports.
    pub fn record_player_culture(&mut self, player: PlayerId, requested: Option<&str>) {
        let culture = match requested {
            Some(tag) => self.negotiate(tag),
            None => self.default_culture.clone(),
        };
        self.player_cultures.insert(player, culture);
    }

    /// Explicitly change a player's culture (language menu / `lang` verb).
    pub fn update_player_culture(
        &mut self,
        player: PlayerId,
        culture: &str,
    ) -> Result<(), PracticeError> {
        if !self.bundles.contains_key(culture) {
            return Err(PracticeError::Locale(format!("culture {} not loaded", culture)));
        }
        self.player_cultures.insert(player, culture.to_string());
        Ok(())
    }

    pub fn culture_of(&self, player: PlayerId) -> &str {
        self.player_cultures.get(&player).map(String::as_str).unwrap_or(&self.default_culture)
    }

    fn negotiate(&self, requested: &str) -> String {
        let available: Vec<LanguageIdentifier> =
            self.bundles.keys().filter_map(|c| c.parse().ok()).collect();
        let requested: Vec<LanguageIdentifier> =
            requested.parse().ok().into_iter().collect();
        let default: LanguageIdentifier =
            self.default_culture.parse().expect("default culture is a valid language id");

        let negotiated = negotiate_languages(
            &requested,
            &available,
            Some(&default),
            NegotiationStrategy::Filtering,
        );
        negotiated
            .first()
            .map(|l| l.to_string())
            .unwrap_or_else(|| self.default_culture.clone())
    }

    /// Format `key` for `player`, falling back to the default culture and
    /// finally to the bracketed key itself.
    pub fn translate(&self, player: PlayerId, key: &str, args: Option<&FluentArgs>) -> String {
        let culture = self.culture_of(player);
        if let Some(bundle) = self.bundles.get(culture) {
            if let Some(message) = bundle.get_message(key) {
                return format_message(bundle, message, args);
            }
        }

        if culture != self.default_culture {
            if let Some(bundle) = self.bundles.get(&self.default_culture) {
                if let Some(message) = bundle.get_message(key) {
                    return format_message(bundle, message, args);
                }
            }
        }

        format!("[{}]", key)
    }

    /// Localized display name of a practice, keyed
    /// `map-<map>-<practice>`; untranslated practices fall back to the raw
    /// name with underscores spaced out.
    pub fn practice_name(&self, player: PlayerId, map: &str, practice: &str) -> String {
        let key = format!("map-{}-{}", map, practice);
        let translated = self.translate(player, &key, None);
        if translated == format!("[{}]", key) {
            practice.replace('_', " ")
        } else {
            translated
        }
    }

    /// Drop state for players no longer relevant (hot reload).
    pub fn clear_players(&mut self) {
        self.player_cultures.clear();
    }
}

fn format_message(
    bundle: &FluentBundle<FluentResource>,
    message: FluentMessage,
    args: Option<&FluentArgs>,
) -> String {
    let Some(pattern) = message.value() else {
        return String::new();
    };
    let mut errors = vec![];
    let formatted = bundle.format_pattern(pattern, args, &mut errors);
    for error in &errors {
        log::debug!("fluent formatting error: {}", error);
    }
    formatted.to_string()
}
