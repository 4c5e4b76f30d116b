//! Practice definitions and the catalog contract.
//!
//! Practice and map data is authored outside the orchestrator; the file
//! format and loading live with the host integration. The core only consumes
//! the [`Catalog`] trait, once per map change.

use crate::host::{Pose, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One pose a practice bot is placed at: where it stands, where it looks,
/// and whether it crouches there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpot {
    pub pose: Pose,
    #[serde(default)]
    pub crouch: bool,
}

/// Immutable drill definition. Loaded once per map change, never mutated at
/// runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Practice {
    /// Stable name, also the localization key suffix.
    pub name: String,
    /// Number of bot entities the drill runs with.
    pub num_bots: usize,
    /// Where the practicing player starts.
    pub player_spawn: Pose,
    /// Ordered target poses served to the player.
    pub targets: Vec<TargetSpot>,
    /// Names of practices that cannot run concurrently with this one.
    #[serde(default)]
    pub incompatible: Vec<String>,
    /// Optional polyline guiding the player along the route.
    #[serde(default)]
    pub guide_line: Vec<Vec3>,
}

/// Supplier of practice definitions, implemented by the host integration.
pub trait Catalog {
    /// Practice definitions for a map; empty when the map has none.
    fn load_practices(&self, map: &str) -> Vec<Practice>;
    /// Maps that have at least one practice definition.
    fn list_available_maps(&self) -> Vec<String>;
}

/// In-memory catalog, used by tests and embedding hosts that source
/// practice data themselves.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    maps: HashMap<String, Vec<Practice>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_map(&mut self, map: &str, practices: Vec<Practice>) {
        self.maps.insert(map.to_string(), practices);
    }
}

impl Catalog for StaticCatalog {
    fn load_practices(&self, map: &str) -> Vec<Practice> {
        self.maps.get(map).cloned().unwrap_or_default()
    }

    fn list_available_maps(&self) -> Vec<String> {
        let mut maps: Vec<String> = self.maps.keys().cloned().collect();
        maps.sort();
        maps
    }
}
