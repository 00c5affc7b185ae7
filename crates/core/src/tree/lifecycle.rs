//! Record lifecycle manager.
//!
//! [`TreeLifecycle`] runs the create / edit / update / delete / reset flows
//! on top of a [`TreeStore`]. Recoverable failures come back as
//! [`LifecycleError::Rejected`] together with the data needed to redisplay
//! the form; storage outages come back as [`LifecycleError::Storage`].

use std::sync::Arc;

use validator::Validate;

use super::{
    Tree, TreeFields, TreeInput, TreeStore, MSG_CREATE_FAILED, MSG_FIELDS_REQUIRED,
    MSG_UPDATE_FAILED,
};
use crate::error::CoreError;
use crate::image::{is_canonical_image_ref, resolve_image};
use crate::types::DbId;
use crate::upload::{PendingUpload, StoredUpload, UploadError, UploadPolicy};

const ENTITY: &str = "Tree";

/// A recoverable failure plus the view state to redisplay.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct Rejection {
    pub error: CoreError,
    /// Full record list at the time of the failure.
    pub trees: Vec<Tree>,
    /// The record being edited, if the failure happened in an edit flow
    /// and the record still exists.
    pub edit_tree: Option<Tree>,
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Rejected(Rejection),

    #[error("Storage unavailable: {0}")]
    Storage(#[source] E),
}

/// Data for rendering the edit form.
#[derive(Debug, Clone)]
pub struct EditView {
    pub trees: Vec<Tree>,
    pub edit_tree: Tree,
}

/// Orchestrates tree CRUD over a [`TreeStore`].
#[derive(Debug, Clone)]
pub struct TreeLifecycle<S> {
    store: S,
    uploads: Arc<UploadPolicy>,
}

impl<S: TreeStore> TreeLifecycle<S> {
    pub fn new(store: S, uploads: Arc<UploadPolicy>) -> Self {
        Self { store, uploads }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn uploads(&self) -> &UploadPolicy {
        &self.uploads
    }

    /// All records, insertion order.
    pub async fn list(&self) -> Result<Vec<Tree>, LifecycleError<S::Error>> {
        self.store.list().await.map_err(LifecycleError::Storage)
    }

    /// Validate, store any upload, resolve the image, and insert.
    pub async fn create(
        &self,
        input: TreeInput,
        upload: Option<PendingUpload>,
    ) -> Result<Tree, LifecycleError<S::Error>> {
        let input = input.normalized();
        if input.validate().is_err() {
            tracing::warn!("Tree create rejected: missing required fields");
            return Err(self.reject(fields_required(), None).await);
        }

        let stored = match self.store_upload(upload, MSG_CREATE_FAILED).await {
            Ok(stored) => stored,
            Err(error) => return Err(self.reject(error, None).await),
        };

        let fields = TreeFields {
            image: resolve_image(input.image_url.as_deref(), stored.as_ref()),
            name: input.name,
            description: input.description,
        };
        debug_assert!(is_canonical_image_ref(&fields.image));

        match self.store.create(&fields).await {
            Ok(tree) => {
                tracing::info!(tree_id = tree.id, image = %tree.image, "Tree created");
                Ok(tree)
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to insert tree");
                self.discard_upload(stored.as_ref()).await;
                Err(self
                    .reject(CoreError::Storage(MSG_CREATE_FAILED.into()), None)
                    .await)
            }
        }
    }

    /// Load one record and the full list for the edit form.
    pub async fn get_for_edit(&self, id: DbId) -> Result<EditView, LifecycleError<S::Error>> {
        let trees = self.list().await?;
        match trees.iter().find(|tree| tree.id == id).cloned() {
            Some(edit_tree) => Ok(EditView { trees, edit_tree }),
            None => {
                tracing::warn!(tree_id = id, "Edit requested for missing tree");
                Err(LifecycleError::Rejected(Rejection {
                    error: not_found(id),
                    trees,
                    edit_tree: None,
                }))
            }
        }
    }

    /// Overwrite name and description; replace the image only when a new
    /// URL or upload resolves to something.
    pub async fn update(
        &self,
        id: DbId,
        input: TreeInput,
        upload: Option<PendingUpload>,
    ) -> Result<Tree, LifecycleError<S::Error>> {
        let input = input.normalized();
        if input.validate().is_err() {
            tracing::warn!(tree_id = id, "Tree update rejected: missing required fields");
            return Err(self.reject(fields_required(), Some(id)).await);
        }

        let existing = match self.store.find_by_id(id).await {
            Ok(Some(tree)) => tree,
            Ok(None) => {
                tracing::warn!(tree_id = id, "Update requested for missing tree");
                return Err(self.reject(not_found(id), None).await);
            }
            Err(err) => {
                tracing::error!(tree_id = id, error = %err, "Failed to load tree for update");
                return Err(self
                    .reject(CoreError::Storage(MSG_UPDATE_FAILED.into()), Some(id))
                    .await);
            }
        };

        let stored = match self.store_upload(upload, MSG_UPDATE_FAILED).await {
            Ok(stored) => stored,
            Err(error) => return Err(self.reject(error, Some(id)).await),
        };

        let image = match resolve_image(input.image_url.as_deref(), stored.as_ref()) {
            resolved if resolved.is_empty() => existing.image,
            resolved => resolved,
        };

        let fields = TreeFields {
            name: input.name,
            description: input.description,
            image,
        };

        match self.store.update(id, &fields).await {
            Ok(Some(tree)) => {
                tracing::info!(tree_id = tree.id, image = %tree.image, "Tree updated");
                Ok(tree)
            }
            Ok(None) => {
                tracing::warn!(tree_id = id, "Tree disappeared before update");
                self.discard_upload(stored.as_ref()).await;
                Err(self.reject(not_found(id), None).await)
            }
            Err(err) => {
                tracing::error!(tree_id = id, error = %err, "Failed to update tree");
                self.discard_upload(stored.as_ref()).await;
                Err(self
                    .reject(CoreError::Storage(MSG_UPDATE_FAILED.into()), Some(id))
                    .await)
            }
        }
    }

    /// Remove one record. Deleting a missing id is not an error.
    pub async fn delete(&self, id: DbId) -> Result<bool, LifecycleError<S::Error>> {
        let removed = self
            .store
            .delete(id)
            .await
            .map_err(LifecycleError::Storage)?;
        tracing::info!(tree_id = id, removed, "Tree delete");
        Ok(removed)
    }

    /// Remove every record.
    pub async fn reset_all(&self) -> Result<u64, LifecycleError<S::Error>> {
        let removed = self
            .store
            .delete_all()
            .await
            .map_err(LifecycleError::Storage)?;
        tracing::info!(removed, "Tree catalog reset");
        Ok(removed)
    }

    /// Persist a pending upload. I/O failures map to `io_message`.
    async fn store_upload(
        &self,
        upload: Option<PendingUpload>,
        io_message: &str,
    ) -> Result<Option<StoredUpload>, CoreError> {
        let Some(pending) = upload else {
            return Ok(None);
        };

        match self.uploads.persist(pending).await {
            Ok(stored) => Ok(Some(stored)),
            Err(UploadError::Io(err)) => {
                tracing::error!(error = %err, "Failed to write uploaded image");
                Err(CoreError::Storage(io_message.to_string()))
            }
            Err(rejected) => {
                tracing::warn!(kind = rejected.kind().as_str(), error = %rejected, "Upload rejected");
                Err(CoreError::Upload(rejected))
            }
        }
    }

    async fn discard_upload(&self, stored: Option<&StoredUpload>) {
        if let Some(stored) = stored {
            self.uploads.discard(stored).await;
        }
    }

    /// Build a rejection carrying the current list (and edit target).
    async fn reject(&self, error: CoreError, editing: Option<DbId>) -> LifecycleError<S::Error> {
        let trees = match self.store.list().await {
            Ok(trees) => trees,
            Err(err) => return LifecycleError::Storage(err),
        };
        let edit_tree =
            editing.and_then(|id| trees.iter().find(|tree| tree.id == id).cloned());

        LifecycleError::Rejected(Rejection {
            error,
            trees,
            edit_tree,
        })
    }
}

fn fields_required() -> CoreError {
    CoreError::Validation(MSG_FIELDS_REQUIRED.into())
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: ENTITY, id }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
