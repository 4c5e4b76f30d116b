//! Host event handlers.
//!
//! Connect, disconnect, spawn and death translate into session and
//! allocator mutations here. Every handler tolerates entities it does not
//! know about: a disconnect for an untracked player, or a spawn/death for
//! an entity that is neither a tracked human nor a managed bot, is a no-op.

use super::{
    DeferredCommand, PracticeOrchestrator, BOT_COMBAT_RANGE, FAST_RESPAWN_DELAY_MS,
    FREEZE_BOT_DELAY_MS, MOVE_BOT_DELAY_MS,
};
use crate::bots::ClaimOutcome;
use crate::host::{EntityId, HostEngine};
use crate::menu::MenuPresenter;

impl<H: HostEngine, M: MenuPresenter> PracticeOrchestrator<H, M> {
    /// A human or bot entered the server.
    pub(crate) fn on_client_put_in_server(&mut self, entity: EntityId) {
        if !self.host.is_valid(entity) {
            return;
        }

        if self.host.is_bot(entity) {
            self.on_bot_join(entity);
            return;
        }

        let Some(player) = self.host.player_id_of(entity) else {
            return;
        };
        let language = self.host.client_language(player);
        self.sessions.add_player(player, self.defaults.player_settings());
        self.translator.record_player_culture(player, language.as_deref());
    }

    /// Claim a freshly created bot for the oldest pending request, or kick
    /// it as an orphan.
    fn on_bot_join(&mut self, bot: EntityId) {
        // Bots that show up while nobody practices belong to the host.
        if self.overlay.active_sessions() == 0 {
            return;
        }
        if self.allocator.is_managed(bot) {
            return;
        }

        match self.allocator.claim_on_create(bot) {
            ClaimOutcome::Assigned(owner) => {
                if let Some(session) = self.sessions.get_mut(owner) {
                    session.bots.insert(bot);
                    log::info!("bot {} spawned and assigned to {}", bot, owner);
                } else {
                    // Requests are purged on session end, so this is a stale
                    // claim that slipped through; destroy the bot.
                    self.allocator.release(bot);
                    self.host.kick_bot(bot);
                }
            }
            ClaimOutcome::Orphan => {
                log::debug!("kicking orphan bot {}", bot);
                self.host.kick_bot(bot);
            }
        }
    }

    pub(crate) fn on_player_disconnect(&mut self, entity: EntityId) {
        let Some(player) = self.host.player_id_of(entity) else {
            log::debug!("disconnect for an entity without player identity");
            return;
        };
        if !self.sessions.contains(player) {
            return;
        }

        if self.sessions.is_active(player) {
            self.exit_practice(player);
        }

        self.sessions.remove_player(player);
        self.allocator.purge_request(player);
    }

    pub(crate) fn on_player_spawn(&mut self, entity: EntityId) {
        if !self.host.is_valid(entity) {
            return;
        }

        if self.host.is_bot(entity) {
            self.on_bot_spawn(entity);
            return;
        }

        let Some(player) = self.host.player_id_of(entity) else {
            return;
        };
        if self.sessions.is_active(player) {
            self.setup_prefire_mode(player);
        }
    }

    /// A managed bot spawned: cycle it onto the owner's next target, or
    /// retire it when the target list is exhausted.
    fn on_bot_spawn(&mut self, bot: EntityId) {
        let Some(owner) = self.allocator.owner_of(bot) else {
            return;
        };
        let Some(session) = self.sessions.get(owner) else {
            // Owner vanished between claim and spawn.
            self.allocator.release(bot);
            self.host.kick_bot(bot);
            return;
        };

        let target_no = session.progress;
        let practice_index = session.practice_index;
        let enabled_len = session.enabled_targets.len();
        let bot_weapon = session.settings.bot_weapon;

        if practice_index < 0 || practice_index as usize >= self.practices.len() {
            self.unassign_and_kick(owner, bot);
            return;
        }

        if target_no < enabled_len {
            let spot_index = session.enabled_targets[target_no];
            if let Some(s) = self.sessions.get_mut(owner) {
                s.progress += 1;
            }

            let Some(spot) =
                self.practices[practice_index as usize].targets.get(spot_index).copied()
            else {
                return;
            };

            self.schedule(
                MOVE_BOT_DELAY_MS,
                DeferredCommand::MoveBot { bot, owner, pose: spot.pose, crouch: spot.crouch },
            );
            self.schedule(FREEZE_BOT_DELAY_MS, DeferredCommand::FreezeBot { bot });

            if let Some(item) = bot_weapon.item_name() {
                self.host.set_money(bot, 0);
                self.host.strip_weapons(bot);
                self.host.give_item(bot, item);
            }

            self.host.set_bot_combat_range(bot, BOT_COMBAT_RANGE);
            // Cycle weapon slots so the bot shoulders its primary.
            self.host.exec_client_command(bot, "slot2");
            self.host.exec_client_command(bot, "slot1");
        } else {
            // Two bots died close together and progress outran the list:
            // this spawn has no target left, so the bot is surplus.
            self.unassign_and_kick(owner, bot);
            if self.sessions.get(owner).map(|s| s.bots.is_empty()).unwrap_or(false) {
                self.finish_practice(owner);
            }
        }
    }

    pub(crate) fn on_player_death(&mut self, entity: EntityId) {
        if !self.host.is_valid(entity) {
            return;
        }

        if self.host.is_bot(entity) {
            self.on_bot_death(entity);
            return;
        }

        let Some(player) = self.host.player_id_of(entity) else {
            return;
        };
        let Some(session) = self.sessions.get(player) else {
            return;
        };
        let practice_index = session.practice_index;
        let owned = session.bots.len();
        if practice_index < 0 || practice_index as usize >= self.practices.len() {
            return;
        }

        // Self-heal the spawn/death race: if bots were lost, restart the
        // placement cycle with a replenished set.
        let required = self.practices[practice_index as usize].num_bots;
        if owned < required {
            if let Some(s) = self.sessions.get_mut(player) {
                s.progress = 0;
            }
            self.add_bots(player, required - owned);
        }
    }

    /// A managed bot died: count the kill once the placement cycle is done,
    /// then either fast-respawn it or retire it.
    fn on_bot_death(&mut self, bot: EntityId) {
        let Some(owner) = self.allocator.owner_of(bot) else {
            return;
        };
        let Some(session) = self.sessions.get(owner) else {
            return;
        };

        // Progress has not been advanced for this death yet.
        let target_no = session.progress;
        let practice_index = session.practice_index;
        let enabled_len = session.enabled_targets.len();
        let owned = session.bots.len();

        if practice_index < 0 || practice_index as usize >= self.practices.len() {
            return;
        }
        let num_bots = self.practices[practice_index as usize].num_bots;

        if target_no >= num_bots {
            // The first `num_bots` deaths only move bots into position;
            // from here on every death is a real practice hit.
            self.award_owner(owner);
            let total = enabled_len as i64;
            let remaining = (total - target_no as i64 + owned as i64 - 1).max(0);
            self.print_practice_progress(owner, practice_index as usize, total, remaining);
        }

        if target_no >= enabled_len {
            self.unassign_and_kick(owner, bot);
            if self.sessions.get(owner).map(|s| s.bots.is_empty()).unwrap_or(false) {
                self.finish_practice(owner);
            }
        } else {
            self.schedule(FAST_RESPAWN_DELAY_MS, DeferredCommand::RespawnBot { bot });
        }
    }

    pub(crate) fn unassign_and_kick(&mut self, owner: crate::host::PlayerId, bot: EntityId) {
        self.allocator.release(bot);
        if let Some(session) = self.sessions.get_mut(owner) {
            session.bots.remove(&bot);
        }
        self.host.kick_bot(bot);
    }
}
