//! Price-per-unit-of-volume computation and display formatting.
//!
//! A record whose package volume is zero or negative cannot be compared on
//! unit price; it gets the `f64::INFINITY` sentinel so it sorts after every
//! comparable record and renders as `"-"`.

/// Computes the price per unit of volume.
///
/// Returns `f64::INFINITY` when `volume <= 0` (zero and negative volume are
/// treated identically). Never panics.
#[must_use]
pub fn unit_price(price: f64, volume: f64) -> f64 {
    if volume > 0.0 {
        price / volume
    } else {
        f64::INFINITY
    }
}

/// Formats a unit price with tiered precision.
///
/// - `f64::INFINITY` → `"-"` (not comparable)
/// - `>= 100` → no decimal places
/// - `10..100` → one decimal place
/// - `< 10` → two decimal places
///
/// The tiering keeps per-gram prices of cheap goods legible (e.g. `"1.89"`)
/// without padding large unit prices with noise.
#[must_use]
pub fn format_unit_price(value: f64) -> String {
    if value.is_infinite() {
        "-".to_string()
    } else if value >= 100.0 {
        format!("{:.0}", value.round())
    } else if value >= 10.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}
