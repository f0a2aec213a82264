//! The persistence collaborator boundary.
//!
//! The engine never owns storage: it consumes wholesale snapshot pushes and
//! issues writes through [`PriceStore`]. Conflicting writes are resolved by
//! the collaborator as last-write-wins per document; the engine does not
//! attempt conflict resolution and never mutates its snapshots optimistically.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use yasune_core::records::{PriceRecord, ProductDefinition, Rating};

use crate::error::EngineError;
use crate::overlay::OverlaySnapshot;

/// Write surface of the backing document store.
///
/// Implementations are expected to apply writes last-write-wins and to
/// surface the result through their next snapshot push, not through return
/// values.
pub trait PriceStore {
    /// Creates or replaces a price record by id.
    fn upsert_record(&mut self, record: PriceRecord) -> Result<(), EngineError>;

    /// Deletes a price record. Deleting an unknown id is a no-op; the store
    /// may already have processed a concurrent delete.
    fn delete_record(&mut self, id: Uuid) -> Result<(), EngineError>;

    /// Creates a product definition. Definitions are never deleted.
    fn insert_definition(&mut self, definition: ProductDefinition) -> Result<(), EngineError>;

    /// Upserts one user's rating of a product name. [`Rating::Unset`] is an
    /// explicit cleared write, not a delete.
    fn put_rating(
        &mut self,
        user_id: &str,
        product_name: &str,
        rating: Rating,
    ) -> Result<(), EngineError>;

    /// Creates the hidden marker for one record.
    fn put_hidden_marker(&mut self, user_id: &str, record_id: Uuid) -> Result<(), EngineError>;

    /// Removes the hidden marker for one record.
    fn remove_hidden_marker(&mut self, user_id: &str, record_id: Uuid) -> Result<(), EngineError>;
}

/// In-memory [`PriceStore`] with the same observable behavior as the hosted
/// document store: per-document last-write-wins, per-user overlay
/// collections, snapshot reads.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<PriceRecord>,
    definitions: HashMap<Uuid, ProductDefinition>,
    ratings: HashMap<String, HashMap<String, Rating>>,
    hidden: HashMap<String, HashSet<Uuid>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current price-record snapshot, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    #[must_use]
    pub fn record(&self, id: Uuid) -> Option<&PriceRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn definitions(&self) -> &HashMap<Uuid, ProductDefinition> {
        &self.definitions
    }

    /// One user's overlay snapshot (ratings and hidden ids). An unknown user
    /// gets an empty overlay.
    #[must_use]
    pub fn overlay_snapshot(&self, user_id: &str) -> OverlaySnapshot {
        OverlaySnapshot {
            ratings_by_product_name: self.ratings.get(user_id).cloned().unwrap_or_default(),
            hidden_ids: self.hidden.get(user_id).cloned().unwrap_or_default(),
        }
    }
}

impl PriceStore for MemoryStore {
    fn upsert_record(&mut self, record: PriceRecord) -> Result<(), EngineError> {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        Ok(())
    }

    fn delete_record(&mut self, id: Uuid) -> Result<(), EngineError> {
        self.records.retain(|r| r.id != id);
        Ok(())
    }

    fn insert_definition(&mut self, definition: ProductDefinition) -> Result<(), EngineError> {
        self.definitions.insert(definition.id, definition);
        Ok(())
    }

    fn put_rating(
        &mut self,
        user_id: &str,
        product_name: &str,
        rating: Rating,
    ) -> Result<(), EngineError> {
        self.ratings
            .entry(user_id.to_string())
            .or_default()
            .insert(product_name.to_string(), rating);
        Ok(())
    }

    fn put_hidden_marker(&mut self, user_id: &str, record_id: Uuid) -> Result<(), EngineError> {
        self.hidden
            .entry(user_id.to_string())
            .or_default()
            .insert(record_id);
        Ok(())
    }

    fn remove_hidden_marker(&mut self, user_id: &str, record_id: Uuid) -> Result<(), EngineError> {
        if let Some(ids) = self.hidden.get_mut(user_id) {
            ids.remove(&record_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use yasune_core::records::{PriceType, ProductFields, RecordShape};

    use super::*;

    fn make_record(price: f64) -> PriceRecord {
        PriceRecord {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            price_excluding_tax: price,
            store_name: "イオン東雲店".to_string(),
            price_type: PriceType::Normal,
            start_date: None,
            end_date: None,
            created_at: Utc::now(),
            shape: RecordShape::Legacy {
                product: ProductFields::default(),
            },
        }
    }

    #[test]
    fn upsert_appends_then_replaces_by_id() {
        let mut store = MemoryStore::new();
        let mut record = make_record(398.0);
        store.upsert_record(record.clone()).unwrap();
        assert_eq!(store.records().len(), 1);

        record.price_excluding_tax = 298.0;
        store.upsert_record(record.clone()).unwrap();
        assert_eq!(store.records().len(), 1);
        assert!((store.record(record.id).unwrap().price_excluding_tax - 298.0).abs() < f64::EPSILON);
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let mut store = MemoryStore::new();
        store.upsert_record(make_record(398.0)).unwrap();
        store.delete_record(Uuid::new_v4()).unwrap();
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn overlays_are_per_user() {
        let mut store = MemoryStore::new();
        let record_id = Uuid::new_v4();
        store.put_rating("alice", "ほんだし", Rating::Three).unwrap();
        store.put_hidden_marker("alice", record_id).unwrap();

        let alice = store.overlay_snapshot("alice");
        assert_eq!(alice.rating_for("ほんだし"), Rating::Three);
        assert!(alice.is_hidden(record_id));

        let bob = store.overlay_snapshot("bob");
        assert_eq!(bob.rating_for("ほんだし"), Rating::Unset);
        assert!(!bob.is_hidden(record_id));
    }

    #[test]
    fn cleared_rating_is_a_write_not_a_delete() {
        let mut store = MemoryStore::new();
        store.put_rating("alice", "ほんだし", Rating::Two).unwrap();
        store.put_rating("alice", "ほんだし", Rating::Unset).unwrap();

        let snapshot = store.overlay_snapshot("alice");
        // The entry remains, reading back as zero stars.
        assert!(snapshot.ratings_by_product_name.contains_key("ほんだし"));
        assert_eq!(snapshot.rating_for("ほんだし"), Rating::Unset);
    }

    #[test]
    fn remove_hidden_marker_unhides() {
        let mut store = MemoryStore::new();
        let record_id = Uuid::new_v4();
        store.put_hidden_marker("alice", record_id).unwrap();
        store.remove_hidden_marker("alice", record_id).unwrap();
        assert!(!store.overlay_snapshot("alice").is_hidden(record_id));
    }
}
