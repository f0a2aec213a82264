//! Store snapshot loading for the CLI.
//!
//! The CLI stands in for the live subscription: instead of push updates it
//! reads one JSON snapshot of the records, definitions, and per-user
//! overlays, in the same document shapes the engine consumes.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use yasune_core::records::{PriceRecord, ProductDefinition, Rating};
use yasune_engine::OverlaySnapshot;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SnapshotFile {
    #[serde(default)]
    pub records: Vec<PriceRecord>,
    #[serde(default)]
    pub definitions: Vec<ProductDefinition>,
    /// user id → product name → stars.
    #[serde(default)]
    pub ratings: HashMap<String, HashMap<String, Rating>>,
    /// user id → hidden record ids.
    #[serde(default)]
    pub hidden: HashMap<String, HashSet<Uuid>>,
}

impl SnapshotFile {
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read snapshot {}: {e}", path.display()))?;
        let snapshot: SnapshotFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse snapshot {}: {e}", path.display()))?;
        Ok(snapshot)
    }

    pub(crate) fn definitions_by_id(&self) -> HashMap<Uuid, ProductDefinition> {
        self.definitions.iter().map(|d| (d.id, d.clone())).collect()
    }

    /// The overlay for `user`, or an empty overlay for anonymous sessions
    /// and unknown users.
    pub(crate) fn overlay_for(&self, user: Option<&str>) -> OverlaySnapshot {
        let Some(user) = user else {
            return OverlaySnapshot::default();
        };
        OverlaySnapshot {
            ratings_by_product_name: self.ratings.get(user).cloned().unwrap_or_default(),
            hidden_ids: self.hidden.get(user).cloned().unwrap_or_default(),
        }
    }
}
