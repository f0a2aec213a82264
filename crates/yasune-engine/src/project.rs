//! Join of price records with their shared product definitions.
//!
//! The output [`ViewRecord`] is the denormalized row everything downstream
//! ranks and renders. A dangling definition reference is a data-quality
//! condition, not an error: the record survives with default product fields
//! and an incomparable unit price.

use std::collections::HashMap;

use uuid::Uuid;

use yasune_core::records::{PriceRecord, ProductDefinition, ProductFields, RecordShape};
use yasune_core::unit_price::unit_price;
use yasune_core::ViewRecord;

/// Normalizes one price record into a [`ViewRecord`], resolving its product
/// identity from `definitions` or from the legacy embedded fields.
///
/// Current-shape records whose definition is missing from the snapshot fall
/// back to empty/default product fields rather than being dropped; the
/// degradation is logged once per record per projection.
#[must_use]
pub fn normalize_record_shape(
    record: &PriceRecord,
    definitions: &HashMap<Uuid, ProductDefinition>,
) -> ViewRecord {
    let fields: ProductFields = match &record.shape {
        RecordShape::Current {
            product_definition_id,
        } => match definitions.get(product_definition_id) {
            Some(definition) => definition.fields.clone(),
            None => {
                tracing::warn!(
                    record_id = %record.id,
                    definition_id = %product_definition_id,
                    "price record references a missing product definition; using defaults"
                );
                ProductFields::default()
            }
        },
        RecordShape::Legacy { product } => product.clone(),
    };

    ViewRecord {
        record_id: record.id,
        user_id: record.user_id.clone(),
        unit_price: unit_price(record.price_excluding_tax, fields.volume),
        product_name: fields.product_name,
        manufacturer: fields.manufacturer,
        volume: fields.volume,
        unit: fields.unit,
        large_category: fields.large_category,
        medium_category: fields.medium_category,
        small_category: fields.small_category,
        price_excluding_tax: record.price_excluding_tax,
        store_name: record.store_name.clone(),
        price_type: record.price_type,
        start_date: record.start_date,
        end_date: record.end_date,
        created_at: record.created_at,
    }
}

/// Projects every price record in the snapshot, preserving input order.
///
/// Never discards a record: partial data degrades per field instead.
#[must_use]
pub fn project(
    records: &[PriceRecord],
    definitions: &HashMap<Uuid, ProductDefinition>,
) -> Vec<ViewRecord> {
    records
        .iter()
        .map(|record| normalize_record_shape(record, definitions))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use yasune_core::records::{PriceType, Unit};

    use super::*;

    fn make_fields(name: &str, volume: f64) -> ProductFields {
        ProductFields {
            product_name: name.to_string(),
            manufacturer: "エバラ食品".to_string(),
            volume,
            unit: Unit::Gram,
            large_category: "調味料".to_string(),
            medium_category: "たれ".to_string(),
            small_category: "焼肉のたれ".to_string(),
        }
    }

    fn make_definition(name: &str, volume: f64) -> ProductDefinition {
        ProductDefinition {
            id: Uuid::new_v4(),
            fields: make_fields(name, volume),
            created_at: Utc::now(),
        }
    }

    fn make_record(shape: RecordShape, price: f64) -> PriceRecord {
        PriceRecord {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            price_excluding_tax: price,
            store_name: "イオン東雲店".to_string(),
            price_type: PriceType::Normal,
            start_date: None,
            end_date: None,
            created_at: Utc::now(),
            shape,
        }
    }

    #[test]
    fn current_record_takes_fields_from_definition() {
        let definition = make_definition("黄金の味 中辛", 210.0);
        let definitions = HashMap::from([(definition.id, definition.clone())]);
        let record = make_record(
            RecordShape::Current {
                product_definition_id: definition.id,
            },
            398.0,
        );

        let view = normalize_record_shape(&record, &definitions);
        assert_eq!(view.product_name, "黄金の味 中辛");
        assert_eq!(view.manufacturer, "エバラ食品");
        assert!((view.volume - 210.0).abs() < f64::EPSILON);
        assert_eq!(view.large_category, "調味料");
        assert!((view.unit_price - 398.0 / 210.0).abs() < 1e-12);
    }

    #[test]
    fn legacy_record_uses_embedded_fields() {
        let record = make_record(
            RecordShape::Legacy {
                product: make_fields("ほんだし", 120.0),
            },
            258.0,
        );

        let view = normalize_record_shape(&record, &HashMap::new());
        assert_eq!(view.product_name, "ほんだし");
        assert!((view.unit_price - 258.0 / 120.0).abs() < 1e-12);
    }

    #[test]
    fn missing_definition_degrades_to_defaults() {
        let record = make_record(
            RecordShape::Current {
                product_definition_id: Uuid::new_v4(),
            },
            398.0,
        );

        let view = normalize_record_shape(&record, &HashMap::new());
        assert_eq!(view.product_name, "");
        assert_eq!(view.manufacturer, "");
        assert_eq!(view.unit, Unit::Gram);
        // Zero default volume makes the row incomparable, never dropped.
        assert_eq!(view.unit_price, f64::INFINITY);
        assert!((view.price_excluding_tax - 398.0).abs() < f64::EPSILON);
    }

    #[test]
    fn project_preserves_order_and_count() {
        let definition = make_definition("黄金の味 中辛", 210.0);
        let definitions = HashMap::from([(definition.id, definition.clone())]);
        let records = vec![
            make_record(
                RecordShape::Legacy {
                    product: make_fields("ほんだし", 120.0),
                },
                258.0,
            ),
            make_record(
                RecordShape::Current {
                    product_definition_id: definition.id,
                },
                398.0,
            ),
            // Dangling reference still yields a row.
            make_record(
                RecordShape::Current {
                    product_definition_id: Uuid::new_v4(),
                },
                100.0,
            ),
        ];

        let views = project(&records, &definitions);
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].product_name, "ほんだし");
        assert_eq!(views[1].product_name, "黄金の味 中辛");
        assert_eq!(views[2].product_name, "");
    }
}
