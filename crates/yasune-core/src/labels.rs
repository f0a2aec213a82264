//! Display labels for promotional windows and record age.

use chrono::{DateTime, Datelike, Utc};

use crate::records::PriceType;

const SECS_PER_DAY: i64 = 86_400;

/// Resolves the validity annotation for a price observation.
///
/// - [`PriceType::Normal`] → `""` (no annotation)
/// - [`PriceType::DailySpecial`] → `"{month}/{day}"` from `start_date`
/// - [`PriceType::PeriodSpecial`] → `"~{month}/{day}"` from `end_date`
///   (read as "valid until")
///
/// A missing date field is a data-quality condition, not an error: the label
/// degrades to `""`.
#[must_use]
pub fn price_window_label(
    price_type: PriceType,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
) -> String {
    match price_type {
        PriceType::Normal => String::new(),
        PriceType::DailySpecial => start_date
            .map(|d| format!("{}/{}", d.month(), d.day()))
            .unwrap_or_default(),
        PriceType::PeriodSpecial => end_date
            .map(|d| format!("~{}/{}", d.month(), d.day()))
            .unwrap_or_default(),
    }
}

/// Buckets elapsed time since registration into a coarse Japanese label.
///
/// Days are counted as the ceiling of the elapsed fraction, so anything
/// under 24 hours reads as one day. Buckets: up to a week in days, up to a
/// month in weeks, up to six months in months, then a fixed 半年前.
#[must_use]
pub fn age_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_secs = (now - created_at).num_seconds().abs();
    let days = (elapsed_secs + SECS_PER_DAY - 1) / SECS_PER_DAY;

    if days <= 7 {
        format!("{days}日前")
    } else if days <= 30 {
        format!("{}週前", days / 7)
    } else if days <= 180 {
        format!("{}ヶ月前", days / 30)
    } else {
        "半年前".to_string()
    }
}
