//! The yasune filtering/ranking engine.
//!
//! Consumes snapshots of price records, product definitions, and per-user
//! overlays from the persistence collaborator, and produces the ranked,
//! deduplicated view list. All query paths are synchronous and pure;
//! mutations go through the [`store::PriceStore`] trait gated by a
//! [`overlay::Session`].

pub mod confirm;
mod error;
pub mod migrate;
pub mod overlay;
pub mod pipeline;
pub mod project;
pub mod store;
pub mod suggest;

pub use confirm::{request_delete_record, request_set_rating, PendingConfirmation};
pub use error::EngineError;
pub use migrate::{migrate_legacy_record, register_observation, ObservationInput};
pub use overlay::{can_modify, set_rating, toggle_hidden, OverlaySnapshot, Session};
pub use pipeline::{
    cheapest_alternatives, run_filter, CategorySelection, DedupPolicy, Query, ViewMode,
};
pub use project::{normalize_record_shape, project};
pub use store::{MemoryStore, PriceStore};
pub use suggest::{Suggester, SuggestionSource};
