//! Shared template store
//!
//! Maps template names to parsed records and carries the canonical template
//! version. All state sits behind one mutex; [`TemplateStore::insert`] does
//! the duplicate check, the insert and the version check-and-set in a single
//! lock acquisition.

use crate::model::LinerecorderSensor;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Store-level insert failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Name already taken
    #[error("template {name} already exists")]
    Duplicate {
        /// Colliding template name
        name: String,
    },
}

#[derive(Debug, Default)]
struct StoreInner {
    templates: HashMap<String, Arc<LinerecorderSensor>>,
    order: Vec<String>,
    version: Option<String>,
}

/// Concurrency-safe template store
#[derive(Debug, Default)]
pub struct TemplateStore {
    inner: Mutex<StoreInner>,
}

impl TemplateStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty store ready to be shared with ingestion tasks
    #[inline]
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Insert a record under `name`
    ///
    /// The canonical version is taken from the first inserted record with a
    /// non-empty version and never changes afterwards.
    ///
    /// Returns `true` if this insert set the canonical version.
    ///
    /// # Errors
    /// - `StoreError::Duplicate` if `name` is taken; the store is unchanged
    pub fn insert(
        &self,
        name: impl Into<String>,
        record: LinerecorderSensor,
    ) -> Result<bool, StoreError> {
        let name = name.into();
        let mut inner = self.inner.lock();

        if inner.templates.contains_key(&name) {
            return Err(StoreError::Duplicate { name });
        }

        let set_version = inner.version.is_none() && !record.version.is_empty();
        if set_version {
            inner.version = Some(record.version.clone());
        }

        inner.order.push(name.clone());
        inner.templates.insert(name, Arc::new(record));
        Ok(set_version)
    }

    /// Canonical template version
    #[must_use]
    pub fn version(&self) -> Option<String> {
        self.inner.lock().version.clone()
    }

    /// Record stored under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<LinerecorderSensor>> {
        self.inner.lock().templates.get(name).cloned()
    }

    /// Check if `name` is stored
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().templates.contains_key(name)
    }

    /// Number of stored templates
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().templates.len()
    }

    /// Check if store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().templates.is_empty()
    }

    /// Template names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names = self.inner.lock().order.clone();
        names.sort();
        names
    }

    /// Template names in the order they were inserted
    #[must_use]
    pub fn insertion_order(&self) -> Vec<String> {
        self.inner.lock().order.clone()
    }

    /// Copy of all entries
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, Arc<LinerecorderSensor>> {
        self.inner.lock().templates.clone()
    }

    /// Remove all templates and the canonical version (before a reload)
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.templates.clear();
        inner.order.clear();
        inner.version = None;
    }
}
