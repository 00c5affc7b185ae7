//! [`TreeStore`] backed by PostgreSQL via [`TreeRepo`].

use treeshop_core::tree::{Tree, TreeFields, TreeStore};
use treeshop_core::types::DbId;

use crate::repositories::TreeRepo;
use crate::DbPool;

/// PostgreSQL tree store. Cheap to clone (the pool is reference counted).
#[derive(Debug, Clone)]
pub struct PgTreeStore {
    pool: DbPool,
}

impl PgTreeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TreeStore for PgTreeStore {
    type Error = sqlx::Error;

    async fn list(&self) -> Result<Vec<Tree>, Self::Error> {
        let rows = TreeRepo::list(&self.pool).await?;
        Ok(rows.into_iter().map(Tree::from).collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Tree>, Self::Error> {
        Ok(TreeRepo::find_by_id(&self.pool, id).await?.map(Tree::from))
    }

    async fn create(&self, fields: &TreeFields) -> Result<Tree, Self::Error> {
        TreeRepo::create(&self.pool, fields).await.map(Tree::from)
    }

    async fn update(&self, id: DbId, fields: &TreeFields) -> Result<Option<Tree>, Self::Error> {
        Ok(TreeRepo::update(&self.pool, id, fields).await?.map(Tree::from))
    }

    async fn delete(&self, id: DbId) -> Result<bool, Self::Error> {
        TreeRepo::delete(&self.pool, id).await
    }

    async fn delete_all(&self) -> Result<u64, Self::Error> {
        TreeRepo::delete_all(&self.pool).await
    }
}
