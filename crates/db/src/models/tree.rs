//! Row model for the `trees` table.

use sqlx::FromRow;
use treeshop_core::tree::Tree;
use treeshop_core::types::{DbId, Timestamp};

/// A row from the `trees` table.
#[derive(Debug, Clone, FromRow)]
pub struct TreeRow {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<TreeRow> for Tree {
    fn from(row: TreeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
