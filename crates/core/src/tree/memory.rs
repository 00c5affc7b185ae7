//! In-memory [`TreeStore`] used by the lifecycle tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use super::{Tree, TreeFields, TreeStore};
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
#[error("memory store unavailable")]
pub struct MemoryStoreError;

#[derive(Debug, Default)]
pub struct MemoryTreeStore {
    rows: Mutex<Rows>,
    fail_writes: AtomicBool,
    fail_all: AtomicBool,
}

#[derive(Debug, Default)]
struct Rows {
    next_id: DbId,
    trees: Vec<Tree>,
}

impl MemoryTreeStore {
    /// Make `create` / `update` fail while reads keep working.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every operation fail.
    pub fn fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<(), MemoryStoreError> {
        if self.fail_all.load(Ordering::SeqCst) {
            Err(MemoryStoreError)
        } else {
            Ok(())
        }
    }

    fn check_write(&self) -> Result<(), MemoryStoreError> {
        self.check_read()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(MemoryStoreError)
        } else {
            Ok(())
        }
    }
}

impl TreeStore for MemoryTreeStore {
    type Error = MemoryStoreError;

    async fn list(&self) -> Result<Vec<Tree>, Self::Error> {
        self.check_read()?;
        Ok(self.rows.lock().unwrap().trees.clone())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Tree>, Self::Error> {
        self.check_read()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.trees.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, fields: &TreeFields) -> Result<Tree, Self::Error> {
        self.check_write()?;
        let mut rows = self.rows.lock().unwrap();
        rows.next_id += 1;
        let now = Utc::now();
        let tree = Tree {
            id: rows.next_id,
            name: fields.name.clone(),
            description: fields.description.clone(),
            image: fields.image.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.trees.push(tree.clone());
        Ok(tree)
    }

    async fn update(&self, id: DbId, fields: &TreeFields) -> Result<Option<Tree>, Self::Error> {
        self.check_write()?;
        let mut rows = self.rows.lock().unwrap();
        let Some(tree) = rows.trees.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        tree.name = fields.name.clone();
        tree.description = fields.description.clone();
        tree.image = fields.image.clone();
        tree.updated_at = Utc::now();
        Ok(Some(tree.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, Self::Error> {
        self.check_write()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.trees.len();
        rows.trees.retain(|t| t.id != id);
        Ok(rows.trees.len() < before)
    }

    async fn delete_all(&self) -> Result<u64, Self::Error> {
        self.check_write()?;
        let mut rows = self.rows.lock().unwrap();
        let removed = rows.trees.len() as u64;
        rows.trees.clear();
        Ok(removed)
    }
}
