//! Deferred commands.
//!
//! Delayed work is queued as data and executed against fresh state when its
//! delay elapses. There is no cancellation: a command whose preconditions
//! stopped holding (entity gone, bot re-owned, session ended) must detect
//! that here and do nothing.

use super::{PracticeOrchestrator, CROUCH_DELAY_MS, INVALID_BOT_SWEEP_DELAY_MS};
use crate::env;
use crate::host::{EntityId, HostEngine, PlayerId, Pose};
use crate::menu::MenuPresenter;

/// Work scheduled for a later tick.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredCommand {
    /// Teleport a placed bot onto its target pose.
    MoveBot { bot: EntityId, owner: PlayerId, pose: Pose, crouch: bool },
    /// Force a placed bot into a crouch.
    CrouchBot { bot: EntityId },
    /// Pin a placed bot in place.
    FreezeBot { bot: EntityId },
    /// Fast respawn after a counted kill.
    RespawnBot { bot: EntityId },
    /// Restart the placement cycle for a session's bots.
    ResetBots { player: PlayerId },
    /// Unmanage bots that were found invalid during a reset.
    SweepInvalidBots { player: PlayerId, bots: Vec<EntityId> },
    /// Apply the drill starting health.
    SetPlayerHealth { player: PlayerId, health: i32 },
    /// Hand the practicing player the standard loadout.
    EquipPlayer { player: PlayerId },
    /// Move the practicing player to the drill spawn pose.
    MovePlayerToSpawn { player: PlayerId, pose: Pose },
    /// Draw the practice guide line.
    CreateGuideLine { player: PlayerId },
    /// Force-break drill-relevant map geometry.
    BreakObstacles,
}

impl<H: HostEngine, M: MenuPresenter> PracticeOrchestrator<H, M> {
    pub(crate) fn execute_deferred(&mut self, command: DeferredCommand) {
        match command {
            DeferredCommand::MoveBot { bot, owner, pose, crouch } => {
                // The bot may have died, been kicked, or been re-assigned
                // since placement was scheduled.
                if !self.host.is_alive(bot) || self.allocator.owner_of(bot) != Some(owner) {
                    return;
                }
                self.host.teleport(bot, &pose);
                if crouch {
                    self.schedule(CROUCH_DELAY_MS, DeferredCommand::CrouchBot { bot });
                }
            }

            DeferredCommand::CrouchBot { bot } => {
                if self.host.is_alive(bot) {
                    self.host.set_crouching(bot, true);
                }
            }

            DeferredCommand::FreezeBot { bot } => {
                if self.host.is_alive(bot) && self.host.is_bot(bot) {
                    self.host.freeze(bot);
                }
            }

            DeferredCommand::RespawnBot { bot } => {
                // Only respawn if the bot is confirmed still dead.
                if self.host.is_valid(bot) && !self.host.is_alive(bot) {
                    self.host.respawn(bot);
                }
            }

            DeferredCommand::ResetBots { player } => self.reset_bots(player),

            DeferredCommand::SweepInvalidBots { player, bots } => {
                for bot in bots {
                    self.allocator.release(bot);
                    if let Some(session) = self.sessions.get_mut(player) {
                        session.bots.remove(&bot);
                    }
                }
            }

            DeferredCommand::SetPlayerHealth { player, health } => {
                if let Some(entity) = self.host.entity_of(player) {
                    if self.host.is_alive(entity) {
                        self.host.set_health(entity, health);
                    }
                }
            }

            DeferredCommand::EquipPlayer { player } => {
                if let Some(entity) = self.host.entity_of(player) {
                    if self.host.is_alive(entity) {
                        self.equip_player(entity);
                    }
                }
            }

            DeferredCommand::MovePlayerToSpawn { player, pose } => {
                if let Some(entity) = self.host.entity_of(player) {
                    if self.host.is_alive(entity) {
                        self.host.teleport(entity, &pose);
                    }
                }
            }

            DeferredCommand::CreateGuideLine { player } => self.create_guide_line(player),

            DeferredCommand::BreakObstacles => {
                let map = self.map_name.clone();
                env::break_obstacles(&mut self.host, &map);
            }
        }
    }

    /// Restart the placement cycle: kill every live owned bot so the spawn
    /// handler cycles it onto the first targets again. Bots with stale
    /// handles are unmanaged after a grace period.
    fn reset_bots(&mut self, player: PlayerId) {
        let Some(session) = self.sessions.get_mut(player) else {
            return;
        };
        if !session.is_active() {
            return;
        }
        session.progress = 0;
        let bots: Vec<EntityId> = session.bots.iter().copied().collect();

        let mut invalid = Vec::new();
        for bot in bots {
            if !self.host.is_valid(bot) {
                log::warn!("session {} holds an invalid bot {}, unmanaging it", player, bot);
                invalid.push(bot);
            }
            if self.host.is_alive(bot) {
                self.host.slay(bot);
            }
        }

        if !invalid.is_empty() {
            self.schedule(
                INVALID_BOT_SWEEP_DELAY_MS,
                DeferredCommand::SweepInvalidBots { player, bots: invalid },
            );
        }
    }

    /// Draw the guide polyline for the player's active practice, one beam
    /// per segment.
    fn create_guide_line(&mut self, player: PlayerId) {
        let Some(session) = self.sessions.get(player) else {
            return;
        };
        let index = session.practice_index;
        if index < 0 || index as usize >= self.practices.len() {
            return;
        }

        let line = self.practices[index as usize].guide_line.clone();
        if line.len() < 2 {
            return;
        }

        let mut beams = Vec::new();
        for pair in line.windows(2) {
            match self.host.spawn_beam(pair[0], pair[1]) {
                Some(beam) => beams.push(beam),
                None => {
                    log::warn!("failed to create a guide beam for {}", player);
                    break;
                }
            }
        }

        if let Some(session) = self.sessions.get_mut(player) {
            session.beams.extend(beams);
        }
    }
}
