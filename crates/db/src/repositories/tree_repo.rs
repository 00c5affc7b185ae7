//! Repository for the `trees` table.

use sqlx::PgPool;
use treeshop_core::tree::TreeFields;
use treeshop_core::types::DbId;

use crate::models::tree::TreeRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, image, created_at, updated_at";

/// Provides CRUD operations for trees.
pub struct TreeRepo;

impl TreeRepo {
    /// Insert a new tree, returning the created row.
    pub async fn create(pool: &PgPool, input: &TreeFields) -> Result<TreeRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO trees (name, description, image) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TreeRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image)
            .fetch_one(pool)
            .await
    }

    /// Find a tree by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TreeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trees WHERE id = $1");
        sqlx::query_as::<_, TreeRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all trees in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<TreeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trees ORDER BY id");
        sqlx::query_as::<_, TreeRow>(&query).fetch_all(pool).await
    }

    /// Overwrite name, description and image.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &TreeFields,
    ) -> Result<Option<TreeRow>, sqlx::Error> {
        let query = format!(
            "UPDATE trees SET \
                name = $2, \
                description = $3, \
                image = $4, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TreeRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tree. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every tree, returning the number of rows removed.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trees").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
