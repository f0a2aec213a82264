//! Per-user overlay state (ratings, hidden ids) and the session that gates
//! overlay mutations.
//!
//! The engine holds overlays only as read-only snapshots replaced wholesale
//! by the collaborator's pushes. Mutations go through [`set_rating`] and
//! [`toggle_hidden`], which require a signed-in [`Session`] and take effect
//! on the next push rather than locally.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use yasune_core::records::Rating;

use crate::error::EngineError;
use crate::store::PriceStore;

/// The current identity, threaded explicitly into every write path instead
/// of being read from ambient global state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    #[must_use]
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }

    pub(crate) fn require_user(&self) -> Result<&str, EngineError> {
        self.user_id.as_deref().ok_or(EngineError::SignedOut)
    }
}

/// Returns `true` when the session owns the record, i.e. edit/delete
/// affordances may be shown. Actual write authorization stays with the
/// persistence collaborator.
#[must_use]
pub fn can_modify(session: &Session, owner_user_id: &str) -> bool {
    session.user_id() == Some(owner_user_id)
}

/// One user's overlay state as of the latest push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlaySnapshot {
    pub ratings_by_product_name: HashMap<String, Rating>,
    pub hidden_ids: HashSet<Uuid>,
}

impl OverlaySnapshot {
    /// The rating for a product name; a missing entry and an explicit
    /// cleared entry both read as [`Rating::Unset`].
    #[must_use]
    pub fn rating_for(&self, product_name: &str) -> Rating {
        self.ratings_by_product_name
            .get(product_name)
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_hidden(&self, record_id: Uuid) -> bool {
        self.hidden_ids.contains(&record_id)
    }
}

/// Upserts the session user's rating of a product name.
///
/// [`Rating::Unset`] is a valid explicit clear. The rating applies to every
/// record sharing the name.
///
/// # Errors
///
/// [`EngineError::SignedOut`] when the session has no identity; the change
/// is discarded, local state untouched.
pub fn set_rating<S: PriceStore>(
    store: &mut S,
    session: &Session,
    product_name: &str,
    rating: Rating,
) -> Result<(), EngineError> {
    let user_id = session.require_user()?;
    tracing::debug!(user_id, product_name, stars = rating.stars(), "rating upsert");
    store.put_rating(user_id, product_name, rating)
}

/// Hides a visible record or un-hides a hidden one.
///
/// `currently_hidden` is the caller's view-state for the record; hiding is
/// independent per record, so hiding one observation leaves sibling
/// observations of the same product visible.
///
/// # Errors
///
/// [`EngineError::SignedOut`] when the session has no identity.
pub fn toggle_hidden<S: PriceStore>(
    store: &mut S,
    session: &Session,
    record_id: Uuid,
    currently_hidden: bool,
) -> Result<(), EngineError> {
    let user_id = session.require_user()?;
    if currently_hidden {
        store.remove_hidden_marker(user_id, record_id)
    } else {
        store.put_hidden_marker(user_id, record_id)
    }
}
