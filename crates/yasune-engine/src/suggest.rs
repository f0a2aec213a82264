//! Debounced product-name suggestions for the registration form.
//!
//! Lookups fire only after a quiet typing window (500 ms by default). A
//! newer keystroke supersedes any pending lookup: each call takes a fresh
//! generation, and a lookup whose generation is no longer current discards
//! its result instead of applying stale suggestions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use yasune_core::ViewRecord;

use crate::pipeline::field_matches;

/// The distinct product names available for completion, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct SuggestionSource {
    names: Vec<String>,
}

impl SuggestionSource {
    /// Collects distinct product names from the current projection.
    #[must_use]
    pub fn from_records(records: &[ViewRecord]) -> Self {
        let mut names: Vec<String> = Vec::new();
        for record in records {
            if record.product_name.is_empty() {
                continue;
            }
            if !names.contains(&record.product_name) {
                names.push(record.product_name.clone());
            }
        }
        Self { names }
    }

    /// Names matching `input` with the same kana-insensitive rule as the
    /// search box, capped at `limit`.
    #[must_use]
    pub fn matching(&self, input: &str, limit: usize) -> Vec<String> {
        let lower = input.trim().to_lowercase();
        if lower.is_empty() {
            return Vec::new();
        }
        self.names
            .iter()
            .filter(|name| field_matches(name, &lower))
            .take(limit)
            .cloned()
            .collect()
    }
}

/// Debounced lookup issuer. One instance per input field.
#[derive(Debug)]
pub struct Suggester {
    debounce: Duration,
    generation: AtomicU64,
}

impl Suggester {
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            generation: AtomicU64::new(0),
        }
    }

    /// Resolves suggestions for `input` after the debounce window.
    ///
    /// Returns `None` when a newer call superseded this one while it was
    /// waiting — the stale result must not be applied.
    pub async fn suggest(
        &self,
        source: &SuggestionSource,
        input: &str,
        limit: usize,
    ) -> Option<Vec<String>> {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != my_generation {
            tracing::debug!(input, "discarding superseded suggestion lookup");
            return None;
        }
        Some(source.matching(input, limit))
    }
}
