use crate::types::DbId;
use crate::upload::UploadError;

/// Domain-level failure reasons surfaced to the presentation layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    /// A storage write failed; the payload is the user-facing message.
    #[error("{0}")]
    Storage(String),
}
