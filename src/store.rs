//! Data-access seam and the in-memory backend.
//!
//! [`ObjectStore`] is the read contract the audit wrapper decorates. The
//! in-memory implementation is intended for embedded usage, tests, and as a
//! reference implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::StoreError;
use crate::object::{Object, ObjectKey};

/// Keyed read access to objects.
pub trait ObjectStore: Send + Sync {
    /// Fetch the object stored under `key`.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] when no object exists under the key, or
    /// whatever the backend reports.
    fn get(&self, key: &ObjectKey) -> Result<Arc<dyn Object>, StoreError>;
}

fn lock_err(context: &'static str) -> StoreError {
    StoreError::Backend {
        message: format!("poisoned lock: {context}"),
    }
}

/// Thread-safe in-memory [`ObjectStore`].
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<ObjectKey, Arc<dyn Object>>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object under its own key.
    ///
    /// # Errors
    /// Backend error when the lock is poisoned.
    pub fn insert(&self, object: Arc<dyn Object>) -> Result<(), StoreError> {
        let key = object.key();
        self.objects
            .write()
            .map_err(|_| lock_err("memory_store"))?
            .insert(key, object);
        Ok(())
    }

    /// Remove the object stored under `key`.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] when nothing is stored under the key.
    pub fn remove(&self, key: &ObjectKey) -> Result<(), StoreError> {
        self.objects
            .write()
            .map_err(|_| lock_err("memory_store"))?
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound { key: key.clone() })
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, key: &ObjectKey) -> Result<Arc<dyn Object>, StoreError> {
        self.objects
            .read()
            .map_err(|_| lock_err("memory_store"))?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { key: key.clone() })
    }
}
