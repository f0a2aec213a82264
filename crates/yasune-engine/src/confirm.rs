//! Two-phase commands for confirmation-gated mutations.
//!
//! Rating writes fan out to every record sharing the product name, and
//! record deletion is destructive, so both require an explicit user
//! confirmation. Instead of blocking dialogs, requesting the mutation
//! returns a [`PendingConfirmation`]: `confirm` performs the store write,
//! `cancel` drops it with no state change.

use uuid::Uuid;

use yasune_core::records::{PriceRecord, Rating};

use crate::error::EngineError;
use crate::overlay::{can_modify, Session};
use crate::store::PriceStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmableAction {
    SetRating {
        product_name: String,
        rating: Rating,
    },
    DeleteRecord {
        record_id: Uuid,
    },
}

/// A mutation awaiting the user's yes/no.
///
/// Holds the identity captured at request time, so a session change between
/// request and confirm cannot redirect the write.
#[derive(Debug, Clone)]
pub struct PendingConfirmation {
    user_id: String,
    action: ConfirmableAction,
}

impl PendingConfirmation {
    #[must_use]
    pub fn action(&self) -> &ConfirmableAction {
        &self.action
    }

    /// The confirmation question to present.
    #[must_use]
    pub fn prompt(&self) -> String {
        match &self.action {
            ConfirmableAction::SetRating { .. } => {
                "この評価を保存しますか？同じ商品名の他の商品にも適用されます。".to_string()
            }
            ConfirmableAction::DeleteRecord { .. } => "この商品を削除しますか？".to_string(),
        }
    }

    /// Commits the mutation to the store.
    ///
    /// # Errors
    ///
    /// Propagates the store's write error.
    pub fn confirm<S: PriceStore>(self, store: &mut S) -> Result<(), EngineError> {
        match self.action {
            ConfirmableAction::SetRating {
                product_name,
                rating,
            } => store.put_rating(&self.user_id, &product_name, rating),
            ConfirmableAction::DeleteRecord { record_id } => store.delete_record(record_id),
        }
    }

    /// Declines the mutation. All state is left unchanged; declining is not
    /// an error.
    pub fn cancel(self) {
        tracing::debug!(user_id = %self.user_id, "confirmation cancelled");
    }
}

/// Stages a rating write for confirmation.
///
/// # Errors
///
/// [`EngineError::SignedOut`] without an identity.
pub fn request_set_rating(
    session: &Session,
    product_name: &str,
    rating: Rating,
) -> Result<PendingConfirmation, EngineError> {
    let user_id = session.require_user()?.to_string();
    Ok(PendingConfirmation {
        user_id,
        action: ConfirmableAction::SetRating {
            product_name: product_name.to_string(),
            rating,
        },
    })
}

/// Stages a record deletion for confirmation.
///
/// # Errors
///
/// [`EngineError::SignedOut`] without an identity;
/// [`EngineError::NotOwner`] when the record belongs to another user.
pub fn request_delete_record(
    session: &Session,
    record: &PriceRecord,
) -> Result<PendingConfirmation, EngineError> {
    let user_id = session.require_user()?.to_string();
    if !can_modify(session, &record.user_id) {
        return Err(EngineError::NotOwner(record.id));
    }
    Ok(PendingConfirmation {
        user_id,
        action: ConfirmableAction::DeleteRecord {
            record_id: record.id,
        },
    })
}
