use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// YAML category hierarchy (see `categories.rs`).
    pub categories_path: PathBuf,
    /// JSON store snapshot consumed by the CLI.
    pub snapshot_path: PathBuf,
    /// Quiet window before a product-name suggestion lookup fires.
    pub suggest_debounce_ms: u64,
    /// Row cap for the cheapest-at-other-stores listing.
    pub alternatives_limit: usize,
}
