//! Domain types for price observations and shared product definitions.
//!
//! A [`ProductDefinition`] is the shared identity of a purchasable good; a
//! [`PriceRecord`] is one reported price for it at one store. Records created
//! before the definition split embed the product fields directly — that
//! legacy shape is a first-class [`RecordShape`] variant, not optional-field
//! probing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::unit_price::unit_price;
use crate::CoreError;

/// Package volume unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "kg")]
    Kilogram,
    /// Piece count, displayed as 入り ("contains N").
    #[serde(rename = "入り")]
    Count,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Gram => write!(f, "g"),
            Unit::Milliliter => write!(f, "ml"),
            Unit::Kilogram => write!(f, "kg"),
            Unit::Count => write!(f, "入り"),
        }
    }
}

/// Pricing mode of an observation.
///
/// Exactly one mode holds per record; `end_date` is only meaningful for
/// [`PriceType::PeriodSpecial`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceType {
    #[default]
    Normal,
    /// Valid on the single day in `start_date`.
    DailySpecial,
    /// Valid through the range `start_date..=end_date`.
    PeriodSpecial,
}

/// A user's star rating of a product *name*.
///
/// The rating keys on the product-name string and applies to every record
/// sharing that name — it is a judgement on the product, not on a specific
/// offer. A reused name therefore shares one rating; the model carries that
/// behavior over from the source data as-is.
///
/// [`Rating::Unset`] doubles as the explicit "cleared" state: clearing is a
/// write of 0, not a delete, and both read back identically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    #[default]
    Unset,
    One,
    Two,
    Three,
}

impl Rating {
    /// Returns `true` for any set rating (1–3).
    #[must_use]
    pub fn is_favorite(self) -> bool {
        self != Rating::Unset
    }

    #[must_use]
    pub fn stars(self) -> u8 {
        self.into()
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Unset => 0,
            Rating::One => 1,
            Rating::Two => 2,
            Rating::Three => 3,
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rating::Unset),
            1 => Ok(Rating::One),
            2 => Ok(Rating::Two),
            3 => Ok(Rating::Three),
            other => Err(CoreError::InvalidRating(other)),
        }
    }
}

/// The product-identity fields shared by [`ProductDefinition`] and the
/// legacy embedded record shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub manufacturer: String,
    /// Package size in `unit`; `<= 0` means the unit price is not comparable.
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub large_category: String,
    #[serde(default)]
    pub medium_category: String,
    #[serde(default)]
    pub small_category: String,
}

/// Shared identity of a purchasable good, referenced by price records.
///
/// Definitions are created at registration when no content-equal definition
/// exists, and are never deleted by the engine — deleting the last
/// referencing record leaves the definition orphaned, which is acceptable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDefinition {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: ProductFields,
    pub created_at: DateTime<Utc>,
}

impl ProductDefinition {
    /// Content equality across name, volume, unit, manufacturer, and the
    /// category levels — the reuse key when registering a new observation.
    #[must_use]
    pub fn content_matches(&self, fields: &ProductFields) -> bool {
        self.fields == *fields
    }
}

/// Discriminated link from a price record to its product identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum RecordShape {
    /// Current shape: references a shared [`ProductDefinition`].
    Current { product_definition_id: Uuid },
    /// Pre-split shape: product fields embedded directly on the record.
    Legacy {
        #[serde(flatten)]
        product: ProductFields,
    },
}

impl RecordShape {
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        matches!(self, RecordShape::Legacy { .. })
    }
}

/// One reported price at one store at one time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    pub id: Uuid,
    /// Opaque identity token of the reporting user; gates edit/delete.
    pub user_id: String,
    pub price_excluding_tax: f64,
    pub store_name: String,
    pub price_type: PriceType,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub shape: RecordShape,
}

/// The denormalized row the filter pipeline ranks and the UI renders.
///
/// Computed per refresh by joining a [`PriceRecord`] with its definition;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRecord {
    pub record_id: Uuid,
    pub user_id: String,
    pub product_name: String,
    pub manufacturer: String,
    pub volume: f64,
    pub unit: Unit,
    pub large_category: String,
    pub medium_category: String,
    pub small_category: String,
    pub price_excluding_tax: f64,
    pub store_name: String,
    pub price_type: PriceType,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// `price_excluding_tax / volume`, or `f64::INFINITY` when `volume <= 0`.
    pub unit_price: f64,
}

impl ViewRecord {
    /// Recomputes the derived unit price from the current price and volume.
    pub fn refresh_unit_price(&mut self) {
        self.unit_price = unit_price(self.price_excluding_tax, self.volume);
    }
}
