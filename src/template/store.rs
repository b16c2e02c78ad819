//! Versioned persistence for the template list.
//!
//! A store hands out the whole list together with a version number. Saving
//! names the version the caller read; if the stored list has moved on since,
//! the save is rejected with [`StoreError::Conflict`] and nothing is written.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::StyleTemplateItem;

/// Errors raised by a template store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stale template list: read version {expected}, stored version {found}")]
    Conflict { expected: u64, found: u64 },

    #[error("template store lock poisoned")]
    Poisoned,
}

/// A value and the store version it was read at.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub version: u64,
    pub items: T,
}

/// Load and save of the full template list.
pub trait TemplateStore {
    fn load(&self) -> Result<Versioned<Vec<StyleTemplateItem>>, StoreError>;

    /// Replace the list if the stored version still equals `expected`.
    /// Returns the new version.
    fn save(&self, expected: u64, items: &[StyleTemplateItem]) -> Result<u64, StoreError>;
}

impl<S: TemplateStore + ?Sized> TemplateStore for &S {
    fn load(&self) -> Result<Versioned<Vec<StyleTemplateItem>>, StoreError> {
        (**self).load()
    }

    fn save(&self, expected: u64, items: &[StyleTemplateItem]) -> Result<u64, StoreError> {
        (**self).save(expected, items)
    }
}

fn check_version(expected: u64, found: u64) -> Result<(), StoreError> {
    if expected == found {
        Ok(())
    } else {
        Err(StoreError::Conflict { expected, found })
    }
}

/// An in-process store. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Versioned<Vec<StyleTemplateItem>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with `items` at version 0.
    pub fn with_items(items: Vec<StyleTemplateItem>) -> Self {
        MemoryStore {
            inner: Arc::new(Mutex::new(Versioned { version: 0, items })),
        }
    }
}

impl TemplateStore for MemoryStore {
    fn load(&self) -> Result<Versioned<Vec<StyleTemplateItem>>, StoreError> {
        let guard = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, expected: u64, items: &[StyleTemplateItem]) -> Result<u64, StoreError> {
        let mut guard = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        check_version(expected, guard.version)?;
        guard.version += 1;
        guard.items = items.to_vec();
        Ok(guard.version)
    }
}

/// A store backed by one JSON file.
///
/// The file holds `{ "version": n, "items": [...] }`. A missing file reads as
/// an empty list at version 0. Writes go to a sibling temp file which is then
/// renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TemplateStore for JsonFileStore {
    fn load(&self) -> Result<Versioned<Vec<StyleTemplateItem>>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Versioned::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, expected: u64, items: &[StyleTemplateItem]) -> Result<u64, StoreError> {
        let current = self.load()?;
        check_version(expected, current.version)?;

        let next = Versioned {
            version: current.version + 1,
            items,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, serde_json::to_vec_pretty(&next)?)?;
        fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), version = next.version, "saved templates");
        Ok(next.version)
    }
}
