//! Tree records, the storage seam, and the record lifecycle.

use std::future::Future;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{DbId, Timestamp};

mod lifecycle;
#[cfg(test)]
mod memory;

pub use lifecycle::{EditView, LifecycleError, Rejection, TreeLifecycle};

/// User-facing message for a missing name or description.
pub const MSG_FIELDS_REQUIRED: &str = "Tree name and description are required.";

/// User-facing message when a create cannot be persisted.
pub const MSG_CREATE_FAILED: &str = "Error uploading image.";

/// User-facing message when an update cannot be persisted.
pub const MSG_UPDATE_FAILED: &str = "Error updating tree.";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A stored tree record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tree {
    pub id: DbId,
    pub name: String,
    pub description: String,
    /// Canonical image reference; see [`crate::image`].
    pub image: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Column values written on insert and on update (full overwrite).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFields {
    pub name: String,
    pub description: String,
    pub image: String,
}

/// Submitted form values for create and update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TreeInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    /// External URL or path-like reference; blank means "none".
    pub image_url: Option<String>,
}

impl TreeInput {
    /// Strip surrounding whitespace so blank fields fail validation.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url: self.image_url,
        }
    }
}

// ---------------------------------------------------------------------------
// Storage seam
// ---------------------------------------------------------------------------

/// Persistence operations over the single `trees` collection.
///
/// Implemented by the PostgreSQL store in `treeshop-db`; the lifecycle only
/// ever talks to storage through this trait.
pub trait TreeStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// All records in insertion order.
    fn list(&self) -> impl Future<Output = Result<Vec<Tree>, Self::Error>> + Send;

    fn find_by_id(&self, id: DbId)
        -> impl Future<Output = Result<Option<Tree>, Self::Error>> + Send;

    fn create(&self, fields: &TreeFields) -> impl Future<Output = Result<Tree, Self::Error>> + Send;

    /// Overwrite all fields. Returns `None` if no row with `id` exists.
    fn update(
        &self,
        id: DbId,
        fields: &TreeFields,
    ) -> impl Future<Output = Result<Option<Tree>, Self::Error>> + Send;

    /// Returns `true` if a row was removed.
    fn delete(&self, id: DbId) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Returns the number of rows removed.
    fn delete_all(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}
