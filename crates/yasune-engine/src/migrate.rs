//! Observation registration and legacy-record migration.
//!
//! Registration reuses a content-equal [`ProductDefinition`] when one exists
//! and creates one otherwise, so repeated observations of the same good
//! share a single definition. Editing a pre-split legacy record performs the
//! same resolution once, rewrites the record in the current shape, and
//! deletes the legacy row — the migration happens only on the edit-submit
//! path, never during rendering.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use yasune_core::records::{
    PriceRecord, PriceType, ProductDefinition, ProductFields, RecordShape,
};

use crate::error::EngineError;
use crate::overlay::{can_modify, Session};
use crate::store::PriceStore;

/// The user-entered contents of the registration/edit form.
#[derive(Debug, Clone)]
pub struct ObservationInput {
    pub product: ProductFields,
    pub price_excluding_tax: f64,
    pub store_name: String,
    pub price_type: PriceType,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Finds an existing definition whose content equals `fields`.
///
/// Content equality spans name, volume, unit, manufacturer, and all three
/// category levels; the (`product_name`, `volume`) pair drives the
/// autocomplete that surfaces candidates, but reuse requires the full match.
#[must_use]
pub fn resolve_definition(
    definitions: &HashMap<Uuid, ProductDefinition>,
    fields: &ProductFields,
) -> Option<Uuid> {
    definitions
        .values()
        .find(|d| d.content_matches(fields))
        .map(|d| d.id)
}

/// Registers a new price observation, reusing or creating the definition.
///
/// Returns the id of the new price record.
///
/// # Errors
///
/// [`EngineError::SignedOut`] without an identity; otherwise propagates
/// store write errors.
pub fn register_observation<S: PriceStore>(
    store: &mut S,
    session: &Session,
    definitions: &HashMap<Uuid, ProductDefinition>,
    input: ObservationInput,
    now: DateTime<Utc>,
) -> Result<Uuid, EngineError> {
    let user_id = session.require_user()?.to_string();

    let definition_id = match resolve_definition(definitions, &input.product) {
        Some(id) => id,
        None => {
            let definition = ProductDefinition {
                id: Uuid::new_v4(),
                fields: input.product.clone(),
                created_at: now,
            };
            let id = definition.id;
            store.insert_definition(definition)?;
            id
        }
    };

    let record = PriceRecord {
        id: Uuid::new_v4(),
        user_id,
        price_excluding_tax: input.price_excluding_tax,
        store_name: input.store_name,
        price_type: input.price_type,
        start_date: input.start_date,
        end_date: input.end_date,
        created_at: now,
        shape: RecordShape::Current {
            product_definition_id: definition_id,
        },
    };
    let record_id = record.id;
    store.upsert_record(record)?;
    Ok(record_id)
}

/// Splits a legacy record on edit: resolve/create the definition for the
/// edited fields, write a current-shape record, delete the legacy row.
///
/// Returns the id of the replacement record.
///
/// # Errors
///
/// [`EngineError::SignedOut`] without an identity;
/// [`EngineError::NotOwner`] when editing someone else's record;
/// [`EngineError::NotLegacy`] when the record already references a
/// definition.
pub fn migrate_legacy_record<S: PriceStore>(
    store: &mut S,
    session: &Session,
    definitions: &HashMap<Uuid, ProductDefinition>,
    legacy: &PriceRecord,
    input: ObservationInput,
    now: DateTime<Utc>,
) -> Result<Uuid, EngineError> {
    session.require_user()?;
    if !can_modify(session, &legacy.user_id) {
        return Err(EngineError::NotOwner(legacy.id));
    }
    if !legacy.shape.is_legacy() {
        return Err(EngineError::NotLegacy(legacy.id));
    }

    tracing::info!(record_id = %legacy.id, "splitting legacy record on edit");
    let replacement_id = register_observation(store, session, definitions, input, now)?;
    store.delete_record(legacy.id)?;
    Ok(replacement_id)
}
