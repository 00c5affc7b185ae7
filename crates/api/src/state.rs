use std::sync::Arc;

use treeshop_core::tree::TreeLifecycle;
use treeshop_db::PgTreeStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the lifecycle is behind `Arc` and the pool is a handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: treeshop_db::DbPool,
    /// Tree lifecycle manager (store + upload policy).
    pub trees: Arc<TreeLifecycle<PgTreeStore>>,
}

impl AppState {
    /// Wire the PostgreSQL store and the upload policy into one state value.
    pub fn new(
        pool: treeshop_db::DbPool,
        uploads: Arc<treeshop_core::upload::UploadPolicy>,
    ) -> Self {
        let store = PgTreeStore::new(pool.clone());
        Self {
            pool,
            trees: Arc::new(TreeLifecycle::new(store, uploads)),
        }
    }
}
