//! Drill lifecycle: start, setup, teardown, awards and settings changes.

use super::{
    targets, DeferredCommand, PracticeOrchestrator, BREAKABLES_DELAY_MS, EQUIP_DELAY_MS,
    GUIDE_LINE_DELAY_MS, INITIAL_HEALTH_DELAY_MS, MOVE_PLAYER_DELAY_MS, RANDOM_TARGET_COUNT,
    RESET_BOTS_DELAY_MS,
};
use crate::error::{PracticeError, Result};
use crate::host::{EntityId, HostEngine, PlayerId};
use crate::menu::MenuPresenter;
use crate::session::{BotWeapon, HealingMethod, TrainingMode};
use fluent::{fluent_args, FluentArgs};

/// Standard loadout handed to the practicing player.
const PLAYER_LOADOUT: &[&str] = &[
    "weapon_ak47",
    "weapon_deagle",
    "weapon_knife",
    "weapon_flashbang",
    "weapon_flashbang",
    "weapon_smokegrenade",
    "item_assaultsuit",
];

impl<H: HostEngine, M: MenuPresenter> PracticeOrchestrator<H, M> {
    /// Start (or restart) a drill for `player`. Rejections leave all state
    /// untouched; no bot is requested before validation passes.
    pub fn start_practice(&mut self, player: PlayerId, index: usize) -> Result<()> {
        if !self.sessions.contains(player) {
            return Err(PracticeError::UnknownPlayer(player));
        }
        if index >= self.practices.len() {
            return Err(PracticeError::UnknownPractice { index, count: self.practices.len() });
        }

        let name = self.practices[index].name.clone();
        let num_bots = self.practices[index].num_bots;
        if self.practices[index].targets.is_empty() {
            return Err(PracticeError::NoTargets(name));
        }

        let previous = self.sessions.get(player).map(|s| s.practice_index).unwrap_or(-1);
        if previous != index as i32 && !self.guard.can_start(index) {
            return Err(PracticeError::Incompatible(name));
        }

        // First active drill on the server: overlay the environment.
        if self.overlay.active_sessions() == 0 {
            self.overlay.activate(&mut self.host);
            self.schedule(BREAKABLES_DELAY_MS, DeferredCommand::BreakObstacles);
        }

        if previous != index as i32 {
            if previous > -1 {
                // Switching drills keeps the overlay held: the release in
                // the teardown is paired with the retain below.
                self.unset_prefire_mode(player);
            }

            self.overlay.retain();
            if let Some(session) = self.sessions.get_mut(player) {
                session.practice_index = index as i32;
            }
            self.schedule(GUIDE_LINE_DELAY_MS, DeferredCommand::CreateGuideLine { player });

            let incompatible = self.incompatible_indices(index);
            self.guard.on_start(index, &incompatible);

            self.add_bots(player, num_bots);
        } else {
            // Same drill again: top up bots lost to the spawn/death race.
            let owned = self.sessions.get(player).map(|s| s.bots.len()).unwrap_or(0);
            if owned < num_bots {
                if let Some(session) = self.sessions.get_mut(player) {
                    session.progress = 0;
                }
                self.add_bots(player, num_bots - owned);
            }
        }

        self.setup_prefire_mode(player);

        let localized = self.translator.practice_name(player, &self.map_name, &name);
        self.chat_key(player, "practice-choose", Some(&fluent_args!["name" => localized]));
        let begin = self.translator.translate(player, "practice-begin", None);
        self.host.print_center(player, &begin);
        Ok(())
    }

    /// `exit` verb / menu stop: end the drill and confirm in chat.
    pub fn force_stop_practice(&mut self, player: PlayerId) {
        self.exit_practice(player);
        self.chat_key(player, "practice-exit", None);
    }

    /// Completion path: congratulate, then tear down.
    pub(crate) fn finish_practice(&mut self, player: PlayerId) {
        self.chat_key(player, "practice-finish", None);
        self.exit_practice(player);
    }

    /// End a drill and restore the environment when this was the last one.
    pub(crate) fn exit_practice(&mut self, player: PlayerId) {
        self.unset_prefire_mode(player);
        if self.overlay.active_sessions() == 0 && self.overlay.is_captured() {
            self.overlay.deactivate(&mut self.host);
        }
    }

    /// Session-side teardown: bots, guide line, compatibility, index,
    /// reference count and any stuck bot request.
    fn unset_prefire_mode(&mut self, player: PlayerId) {
        let previous = self.sessions.get(player).map(|s| s.practice_index).unwrap_or(-1);
        if previous <= -1 {
            return;
        }

        self.remove_bots(player);
        self.delete_guide_line(player);

        let incompatible = self.incompatible_indices(previous as usize);
        self.guard.on_end(previous as usize, &incompatible);

        if let Some(session) = self.sessions.get_mut(player) {
            session.practice_index = -1;
        }
        self.overlay.release();

        // A request may still be outstanding if the drill ended before all
        // bots arrived; purge it so a later creation cannot attach to it.
        self.allocator.purge_request(player);
    }

    /// Per-spawn drill setup: fresh targets, bot reset, health, loadout and
    /// the move to the practice spawn, all on their staggered delays.
    pub(crate) fn setup_prefire_mode(&mut self, player: PlayerId) {
        let Some(session) = self.sessions.get(player) else {
            return;
        };
        let index = session.practice_index;
        let healing = session.settings.healing_method;
        if index < 0 || index as usize >= self.practices.len() {
            return;
        }

        self.generate_enabled_targets(player);
        self.schedule(RESET_BOTS_DELAY_MS, DeferredCommand::ResetBots { player });

        if let Some(health) = healing.initial_health() {
            self.schedule(
                INITIAL_HEALTH_DELAY_MS,
                DeferredCommand::SetPlayerHealth { player, health },
            );
        }
        self.schedule(EQUIP_DELAY_MS, DeferredCommand::EquipPlayer { player });

        let spawn = self.practices[index as usize].player_spawn;
        self.schedule(MOVE_PLAYER_DELAY_MS, DeferredCommand::MovePlayerToSpawn { player, pose: spawn });
    }

    /// Select this run's targets according to the player's training mode.
    fn generate_enabled_targets(&mut self, player: PlayerId) {
        let Some(session) = self.sessions.get(player) else {
            return;
        };
        let index = session.practice_index;
        let mode = session.settings.training_mode;
        if index < 0 || index as usize >= self.practices.len() {
            return;
        }

        let total = self.practices[index as usize].targets.len();
        let selected = match mode {
            TrainingMode::Full => (0..total).collect(),
            TrainingMode::RandomSubset => {
                targets::select_random_subset(total, RANDOM_TARGET_COUNT, &mut self.rng)
            }
        };

        if let Some(session) = self.sessions.get_mut(player) {
            session.enabled_targets = selected;
        }
    }

    /// Queue a bot request and ask the host for the creations. Bots join
    /// the side opposite the requesting player.
    pub(crate) fn add_bots(&mut self, player: PlayerId, count: usize) {
        if count == 0 {
            return;
        }
        log::info!("creating {} bots for {}", count, player);
        self.allocator.request_bots(player, count);

        let team = self.host.entity_of(player).and_then(|e| self.host.team_of(e));
        match team {
            Some(team) => {
                for _ in 0..count {
                    self.host.add_bot(team.opposite());
                }
            }
            None => log::warn!("cannot create bots for {}: player has no team", player),
        }
    }

    /// Kick and unmanage every bot the session owns.
    fn remove_bots(&mut self, player: PlayerId) {
        let bots: Vec<EntityId> =
            self.sessions.get(player).map(|s| s.bots.iter().copied().collect()).unwrap_or_default();

        for bot in bots {
            if self.host.is_valid(bot) {
                self.host.kick_bot(bot);
            } else {
                log::warn!("trying to kick an invalid bot {}", bot);
            }
            self.allocator.release(bot);
        }

        if let Some(session) = self.sessions.get_mut(player) {
            session.bots.clear();
            session.progress = 0;
        }
    }

    fn delete_guide_line(&mut self, player: PlayerId) {
        let beams = match self.sessions.get_mut(player) {
            Some(session) => std::mem::take(&mut session.beams),
            None => return,
        };
        for beam in beams {
            if self.host.is_valid(beam) {
                self.host.remove_entity(beam);
            } else {
                log::warn!("failed to delete guide beam {}", beam);
            }
        }
    }

    /// Award a counted kill: armor, full ammunition and the configured
    /// healing bonus. Dead owners get nothing.
    pub(crate) fn award_owner(&mut self, owner: PlayerId) {
        let Some(entity) = self.host.entity_of(owner) else {
            return;
        };
        if !self.host.is_alive(entity) {
            return;
        }

        self.host.give_item(entity, "item_assaultsuit");
        self.refill_ammo(entity);

        let bonus = self
            .sessions
            .get(owner)
            .and_then(|s| s.settings.healing_method.kill_bonus());
        if let Some(bonus) = bonus {
            if let Some(current) = self.host.health_of(entity) {
                self.host.set_health(entity, current + bonus);
            }
        }
    }

    /// Top up magazines and reserves. Grenades keep their counts and
    /// knives are skipped entirely.
    fn refill_ammo(&mut self, entity: EntityId) {
        for (weapon, class) in self.host.weapons_of(entity) {
            if class.is_empty() || class.contains("knife") || class.contains("bayonet") {
                continue;
            }
            let (clip, reserve) = match class.as_str() {
                "weapon_ak47" | "weapon_m4a1" => (31, 90),
                "weapon_m4a1_silencer" => (21, 80),
                "weapon_deagle" => (8, 35),
                "weapon_flashbang" | "weapon_smokegrenade" | "weapon_decoy"
                | "weapon_molotov" | "weapon_incgrenade" => continue,
                _ => (999, 999),
            };
            self.host.set_weapon_ammo(weapon, clip, reserve);
        }
    }

    /// Strip and hand out the standard practice loadout.
    pub(crate) fn equip_player(&mut self, entity: EntityId) {
        self.host.strip_weapons(entity);
        for item in PLAYER_LOADOUT {
            self.host.give_item(entity, item);
        }
        self.host.exec_client_command(entity, "slot1");
    }

    /// Periodic broadcast: center-print the drill status for everyone
    /// currently practicing.
    pub(crate) fn print_progress(&mut self) {
        for entity in self.host.connected_players() {
            let Some(player) = self.host.player_id_of(entity) else {
                continue;
            };
            let Some(session) = self.sessions.get(player) else {
                continue;
            };
            if !session.is_active() {
                continue;
            }
            let index = session.practice_index as usize;
            if index >= self.practices.len() {
                continue;
            }

            let total = session.enabled_targets.len() as i64;
            let remaining =
                (total - session.progress as i64 + session.bots.len() as i64).max(0);
            self.print_practice_progress(player, index, total, remaining);
        }
    }

    /// Center-print "practice name / totals" for one player.
    pub(crate) fn print_practice_progress(
        &mut self,
        player: PlayerId,
        practice: usize,
        total: i64,
        remaining: i64,
    ) {
        let name =
            self.translator.practice_name(player, &self.map_name, &self.practices[practice].name);
        let line = self.translator.translate(
            player,
            "practice-progress",
            Some(&fluent_args!["total" => total, "remaining" => remaining]),
        );
        self.host.print_center(player, &format!("{}\u{2029}{}", name, line));
    }

    /// Switch the server to another practice map; only allowed while no
    /// drill is running.
    pub fn change_map(&mut self, player: PlayerId, map: &str) {
        if !self.available_maps.iter().any(|m| m == map) {
            self.chat_key(player, "mapmenu-not-available", None);
            return;
        }

        if self.overlay.active_sessions() == 0 {
            self.host.change_level(map);
        } else {
            self.chat_key(player, "mapmenu-busy", None);
        }
    }

    pub fn change_difficulty(&mut self, player: PlayerId, method: HealingMethod) {
        let Some(session) = self.sessions.get_mut(player) else {
            return;
        };
        session.settings.healing_method = method;

        let label =
            self.translator.translate(player, &format!("difficulty-{}", method as i32), None);
        self.chat_key(player, "difficulty-set", Some(&fluent_args!["difficulty" => label]));
    }

    pub fn change_training_mode(&mut self, player: PlayerId, mode: TrainingMode) {
        let Some(session) = self.sessions.get_mut(player) else {
            return;
        };
        session.settings.training_mode = mode;

        let label = self.translator.translate(player, &format!("modemenu-{}", mode as i32), None);
        self.chat_key(player, "modemenu-set", Some(&fluent_args!["mode" => label]));
    }

    pub fn set_bot_weapon(&mut self, player: PlayerId, weapon: BotWeapon) {
        let Some(session) = self.sessions.get_mut(player) else {
            return;
        };
        session.settings.bot_weapon = weapon;

        let name = match weapon.display_name() {
            Some(name) => name.to_string(),
            None => self.translator.translate(player, "weaponmenu-random", None),
        };
        self.chat_key(player, "weaponmenu-set", Some(&fluent_args!["weapon" => name]));
    }

    pub fn set_language(&mut self, player: PlayerId, culture: &str) {
        match self.translator.update_player_culture(player, culture) {
            Ok(()) => self.chat_key(player, "languagemenu-set", None),
            Err(_) => self.chat_key(player, "languagemenu-help", None),
        }
    }

    /// Incompatibility list of a practice, resolved to loaded indices.
    pub(crate) fn incompatible_indices(&self, index: usize) -> Vec<usize> {
        let Some(practice) = self.practices.get(index) else {
            return Vec::new();
        };
        practice
            .incompatible
            .iter()
            .filter_map(|name| self.practice_name_to_id.get(name).copied())
            .collect()
    }

    /// Translate `key` for `player` and print it to their chat.
    pub(crate) fn chat_key(&mut self, player: PlayerId, key: &str, args: Option<&FluentArgs>) {
        let text = self.translator.translate(player, key, args);
        self.host.print_chat(player, &text);
    }
}
