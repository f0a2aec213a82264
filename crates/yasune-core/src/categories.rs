//! Three-level category hierarchy loaded from a YAML file.
//!
//! A medium category is only meaningful inside its large category, and a
//! small category only inside its medium one. The tree is reference data for
//! the category drop-downs; the filter pipeline itself treats the selected
//! levels as independent equality filters.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LargeCategory {
    pub name: String,
    #[serde(default)]
    pub medium_categories: Vec<MediumCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediumCategory {
    pub name: String,
    #[serde(default)]
    pub small_categories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryTree {
    pub large_categories: Vec<LargeCategory>,
}

impl CategoryTree {
    /// Names of all large categories, in file order.
    #[must_use]
    pub fn large_names(&self) -> Vec<&str> {
        self.large_categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Names of the medium categories under `large`, or empty if unknown.
    #[must_use]
    pub fn medium_names(&self, large: &str) -> Vec<&str> {
        self.large_categories
            .iter()
            .find(|c| c.name == large)
            .map(|c| c.medium_categories.iter().map(|m| m.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Names of the small categories under `large` → `medium`, or empty if
    /// either level is unknown.
    #[must_use]
    pub fn small_names(&self, large: &str, medium: &str) -> Vec<&str> {
        self.large_categories
            .iter()
            .find(|c| c.name == large)
            .and_then(|c| c.medium_categories.iter().find(|m| m.name == medium))
            .map(|m| m.small_categories.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Load and validate the category tree from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (empty or duplicate names at any level).
pub fn load_categories(path: &Path) -> Result<CategoryTree, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let tree: CategoryTree =
        serde_yaml::from_str(&content).map_err(ConfigError::CategoriesFileParse)?;

    validate_categories(&tree)?;

    Ok(tree)
}

fn validate_categories(tree: &CategoryTree) -> Result<(), ConfigError> {
    let mut seen_large = HashSet::new();

    for large in &tree.large_categories {
        if large.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "large category name must be non-empty".to_string(),
            ));
        }
        if !seen_large.insert(large.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate large category: '{}'",
                large.name
            )));
        }

        let mut seen_medium = HashSet::new();
        for medium in &large.medium_categories {
            if medium.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "empty medium category name under '{}'",
                    large.name
                )));
            }
            if !seen_medium.insert(medium.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate medium category '{}' under '{}'",
                    medium.name, large.name
                )));
            }

            let mut seen_small = HashSet::new();
            for small in &medium.small_categories {
                if small.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "empty small category name under '{}' > '{}'",
                        large.name, medium.name
                    )));
                }
                if !seen_small.insert(small.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "duplicate small category '{}' under '{}' > '{}'",
                        small, large.name, medium.name
                    )));
                }
            }
        }
    }

    Ok(())
}
