//! Plain-text rendering of ranked view rows.

use chrono::{DateTime, Utc};

use yasune_core::labels::{age_label, price_window_label};
use yasune_core::unit_price::format_unit_price;
use yasune_core::ViewRecord;
use yasune_engine::OverlaySnapshot;

/// Formats one ranked row: stars, manufacturer, name, price (with the
/// promotional window when set), volume, unit price, store, age.
pub(crate) fn render_row(record: &ViewRecord, overlay: &OverlaySnapshot, now: DateTime<Utc>) -> String {
    let stars = "★".repeat(usize::from(overlay.rating_for(&record.product_name).stars()));
    let window = price_window_label(record.price_type, record.start_date, record.end_date);
    let price = if window.is_empty() {
        format!("{}円", record.price_excluding_tax)
    } else {
        format!("{}円 ({window})", record.price_excluding_tax)
    };

    format!(
        "{stars:<3} {manufacturer} | {name} | {price} | {volume}{unit} | {unit_price}円/{unit} | {store} | {age}",
        manufacturer = record.manufacturer,
        name = record.product_name,
        volume = record.volume,
        unit = record.unit,
        unit_price = format_unit_price(record.unit_price),
        store = record.store_name,
        age = age_label(record.created_at, now),
    )
}
