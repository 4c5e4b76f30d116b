//! The practice session orchestrator.
//!
//! Single entry point for host lifecycle events. Owns every piece of
//! mutable practice state (sessions, bot ownership, compatibility, the
//! environment overlay and the deferred-command queue) and mutates it only
//! from the host's tick thread.
//!
//! Handlers are defensive by contract: events for untracked entities are
//! ignored, and every deferred command re-validates its preconditions at
//! fire time (see [`deferred`]).

mod commands;
mod deferred;
mod events;
mod flow;
mod menus;
mod targets;

pub use deferred::DeferredCommand;

use crate::bots::BotAllocator;
use crate::catalog::{Catalog, Practice};
use crate::config::DefaultConfig;
use crate::env::EnvironmentOverlay;
use crate::host::{HostEngine, HostEvent};
use crate::locale::Translator;
use crate::menu::MenuPresenter;
use crate::sched::{RepeatingTimer, TickScheduler};
use crate::session::compat::CompatibilityGuard;
use crate::session::SessionStore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// Period of the progress broadcast.
pub const BROADCAST_PERIOD_MS: u64 = 3_000;

// Delays for deferred commands. The placement pair must keep its ordering:
// the freeze fires after the teleport.
pub(crate) const MOVE_BOT_DELAY_MS: u64 = 500;
pub(crate) const FREEZE_BOT_DELAY_MS: u64 = 550;
pub(crate) const CROUCH_DELAY_MS: u64 = 200;
pub(crate) const FAST_RESPAWN_DELAY_MS: u64 = 350;
pub(crate) const RESET_BOTS_DELAY_MS: u64 = 500;
pub(crate) const INITIAL_HEALTH_DELAY_MS: u64 = 500;
pub(crate) const EQUIP_DELAY_MS: u64 = 1_000;
pub(crate) const MOVE_PLAYER_DELAY_MS: u64 = 1_500;
pub(crate) const GUIDE_LINE_DELAY_MS: u64 = 1_000;
pub(crate) const BREAKABLES_DELAY_MS: u64 = 500;
pub(crate) const INVALID_BOT_SWEEP_DELAY_MS: u64 = 3_000;

/// Targets used per run in random-subset mode.
pub(crate) const RANDOM_TARGET_COUNT: usize = 7;
pub(crate) const BOT_COMBAT_RANGE: u32 = 2_000;

/// Stateful coordinator of every practice session on the server.
pub struct PracticeOrchestrator<H: HostEngine, M: MenuPresenter> {
    pub(crate) host: H,
    pub(crate) presenter: M,
    pub(crate) catalog: Box<dyn Catalog>,
    pub(crate) translator: Translator,
    pub(crate) sessions: SessionStore,
    pub(crate) allocator: BotAllocator,
    pub(crate) guard: CompatibilityGuard,
    pub(crate) overlay: EnvironmentOverlay,
    pub(crate) scheduler: TickScheduler<DeferredCommand>,
    pub(crate) broadcast: RepeatingTimer,
    pub(crate) defaults: DefaultConfig,
    pub(crate) practices: Vec<Practice>,
    pub(crate) practice_name_to_id: HashMap<String, usize>,
    pub(crate) available_maps: Vec<String>,
    pub(crate) map_name: String,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) clock_ms: u64,
}

impl<H: HostEngine, M: MenuPresenter> PracticeOrchestrator<H, M> {
    pub fn new(
        host: H,
        catalog: Box<dyn Catalog>,
        presenter: M,
        defaults: DefaultConfig,
        seed: u64,
    ) -> Self {
        Self {
            host,
            presenter,
            catalog,
            translator: Translator::new(),
            sessions: SessionStore::new(),
            allocator: BotAllocator::new(),
            guard: CompatibilityGuard::new(),
            overlay: EnvironmentOverlay::new(),
            scheduler: TickScheduler::new(),
            broadcast: RepeatingTimer::new(BROADCAST_PERIOD_MS),
            defaults,
            practices: Vec::new(),
            practice_name_to_id: HashMap::new(),
            available_maps: Vec::new(),
            map_name: String::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock_ms: 0,
        }
    }

    /// Startup (or hot reload). Starts the broadcast timer; a hot reload
    /// rebuilds state from whoever is already connected.
    pub fn on_load(&mut self, now_ms: u64, hot_reload: bool) {
        self.clock_ms = now_ms;
        if hot_reload {
            self.clear_all_states();
            self.setup_players_and_map();
        }
        self.broadcast.start(now_ms);
    }

    /// Shutdown (or hot reload). Stops and clears the broadcast timer and
    /// the deferred queue.
    pub fn on_unload(&mut self, hot_reload: bool) {
        if hot_reload {
            self.clear_all_states();
        }
        self.broadcast.stop();
        self.scheduler.clear();
    }

    /// Single entry point for host lifecycle events.
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::ClientPutInServer { entity } => self.on_client_put_in_server(entity),
            HostEvent::PlayerDisconnect { entity } => self.on_player_disconnect(entity),
            HostEvent::PlayerSpawn { entity } => self.on_player_spawn(entity),
            HostEvent::PlayerDeath { entity } => self.on_player_death(entity),
            HostEvent::MapStart { map } => self.on_map_start(&map),
        }
    }

    /// Host tick: drain due deferred commands, then the periodic broadcast.
    pub fn on_tick(&mut self, now_ms: u64) {
        self.clock_ms = now_ms;
        while let Some(command) = self.scheduler.pop_due(now_ms) {
            self.execute_deferred(command);
        }
        if self.broadcast.fire_due(now_ms) {
            self.print_progress();
        }
    }

    /// Map change: reload the practice list and reset compatibility.
    pub fn on_map_start(&mut self, map: &str) {
        self.map_name = map.to_string();
        self.available_maps = self.catalog.list_available_maps();

        self.practices = if self.available_maps.iter().any(|m| m == map) {
            self.catalog.load_practices(map)
        } else {
            Vec::new()
        };

        self.practice_name_to_id.clear();
        for (index, practice) in self.practices.iter().enumerate() {
            self.practice_name_to_id.insert(practice.name.clone(), index);
        }
        self.guard.reset(self.practices.len());

        if self.practices.is_empty() {
            log::warn!("failed to load practices on map {}", map);
        } else {
            log::info!("loaded {} practices for map {}", self.practices.len(), map);
        }
    }

    /// Schedule a deferred command relative to the current tick.
    pub(crate) fn schedule(&mut self, delay_ms: u64, command: DeferredCommand) {
        let now = self.clock_ms;
        self.scheduler.schedule_in(now, delay_ms, command);
    }

    fn clear_all_states(&mut self) {
        self.sessions.clear();
        self.allocator.clear();
        self.guard.reset(0);
        self.overlay.clear();
        self.scheduler.clear();
        self.translator.clear_players();
        self.practices.clear();
        self.practice_name_to_id.clear();
        self.available_maps.clear();
        self.map_name.clear();
    }

    fn setup_players_and_map(&mut self) {
        let map = self.host.map_name();
        self.on_map_start(&map);

        for entity in self.host.connected_players() {
            self.on_client_put_in_server(entity);
        }
    }

    // --- read-only accessors, mainly for embedders and tests --------------

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn presenter(&self) -> &M {
        &self.presenter
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn environment(&self) -> &EnvironmentOverlay {
        &self.overlay
    }

    pub fn translator_mut(&mut self) -> &mut Translator {
        &mut self.translator
    }

    pub fn practices(&self) -> &[Practice] {
        &self.practices
    }
}
