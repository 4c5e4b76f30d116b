//! # pf_core - Prefire Practice Session Orchestration Engine
//!
//! This library provides the stateful core of a prefire practice mode for a
//! multiplayer shooter: per-player drill sessions, asynchronous bot
//! allocation, mutual exclusion between incompatible drills and a
//! reference-counted overlay of the global server environment.
//!
//! ## Features
//! - Single-threaded, tick-driven state machine with deferred commands
//! - FIFO bot claim protocol with orphan and stuck-request recovery
//! - Fluent-based localization of every player-facing message
//! - Host engine, menu and catalog collaborators behind traits

// Game engine APIs often require many parameters for poses, state, etc.
#![allow(clippy::too_many_arguments)]

pub mod bots;
pub mod catalog;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod host;
pub mod locale;
pub mod menu;
pub mod orchestrator;
pub mod sched;
pub mod session;

// Re-export the main entry points
pub use catalog::{Catalog, Practice, StaticCatalog, TargetSpot};
pub use config::DefaultConfig;
pub use error::{PracticeError, Result};
pub use host::{EntityId, HostEngine, HostEvent, PlayerId, Pose, Rotation, Team, Vec3};
pub use locale::Translator;
pub use menu::{MenuCommand, MenuKind, MenuPresenter, NullPresenter};
pub use orchestrator::{PracticeOrchestrator, BROADCAST_PERIOD_MS};
pub use session::{BotWeapon, HealingMethod, PlayerSettings, TrainingMode};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
