//! Domain layer of the yasune price-comparison engine: record and
//! definition types, unit-price arithmetic, kana folding, display labels,
//! the category hierarchy, and application configuration.

use thiserror::Error;

pub mod app_config;
pub mod categories;
mod config;
pub mod kana;
pub mod labels;
pub mod records;
pub mod unit_price;

pub use app_config::{AppConfig, Environment};
pub use categories::{load_categories, CategoryTree};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{
    PriceRecord, PriceType, ProductDefinition, ProductFields, Rating, RecordShape, Unit,
    ViewRecord,
};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid rating: {0} (expected 0..=3)")]
    InvalidRating(u8),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read categories file {path}: {source}")]
    CategoriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse categories file: {0}")]
    CategoriesFileParse(#[from] serde_yaml::Error),

    #[error("invalid categories config: {0}")]
    Validation(String),
}
