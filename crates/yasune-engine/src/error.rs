use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A write-style action (rate, hide, register) was attempted without an
    /// identity token. Reported to the user as "sign in to continue"; the
    /// attempted change is discarded, not queued.
    #[error("sign in to continue")]
    SignedOut,

    #[error("record {0} is not owned by the current user")]
    NotOwner(Uuid),

    #[error("record {0} does not exist in the store")]
    RecordNotFound(Uuid),

    #[error("record {0} is already in the current shape; nothing to migrate")]
    NotLegacy(Uuid),
}
