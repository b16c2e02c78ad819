//! Saved style templates.
//!
//! A template is a named [`StyleOverrides`] payload. The library keeps at
//! most [`MAX_TEMPLATES`] of them, most recently updated first, and rewrites
//! the whole list on every change.

mod store;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::style::StyleOverrides;

pub use store::{JsonFileStore, MemoryStore, StoreError, TemplateStore, Versioned};

/// Largest number of saved templates.
pub const MAX_TEMPLATES: usize = 20;

/// Longest template name, in characters.
pub const MAX_NAME_CHARS: usize = 40;

/// Attempts made when the stored list changes underneath an update.
const MAX_ATTEMPTS: usize = 3;

/// A saved template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleTemplateItem {
    pub id: Uuid,
    pub name: String,
    pub payload: StyleOverrides,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Errors returned by template operations.
///
/// Serializes as `{ "error": "<message>" }`.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template name must be 1-40 chars.")]
    InvalidName,

    #[error("Template limit reached (20).")]
    LimitReached,

    #[error("Template not found.")]
    NotFound,

    #[error("Template storage failed: {0}")]
    Store(#[from] StoreError),
}

impl Serialize for TemplateError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TemplateError", 1)?;
        state.serialize_field("error", &self.to_string())?;
        state.end()
    }
}

/// Trim `name` and check its length.
pub fn validate_name(name: &str) -> Result<String, TemplateError> {
    let trimmed = name.trim();
    let chars = trimmed.chars().count();
    if (1..=MAX_NAME_CHARS).contains(&chars) {
        Ok(trimmed.to_string())
    } else {
        Err(TemplateError::InvalidName)
    }
}

/// Template operations over a [`TemplateStore`].
#[derive(Debug, Clone)]
pub struct TemplateLibrary<S> {
    store: S,
}

impl<S: TemplateStore> TemplateLibrary<S> {
    pub fn new(store: S) -> Self {
        TemplateLibrary { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All templates, most recently updated first.
    pub fn list(&self) -> Result<Vec<StyleTemplateItem>, TemplateError> {
        let mut items = self.store.load()?.items;
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(items)
    }

    pub fn get(&self, id: Uuid) -> Result<StyleTemplateItem, TemplateError> {
        self.store
            .load()?
            .items
            .into_iter()
            .find(|item| item.id == id)
            .ok_or(TemplateError::NotFound)
    }

    /// Save `payload` under `name` as a new template.
    pub fn save(
        &self,
        name: &str,
        payload: StyleOverrides,
    ) -> Result<StyleTemplateItem, TemplateError> {
        let name = validate_name(name)?;
        let item = self.update(|items| {
            if items.len() >= MAX_TEMPLATES {
                return Err(TemplateError::LimitReached);
            }
            let now = Utc::now();
            let item = StyleTemplateItem {
                id: Uuid::new_v4(),
                name: name.clone(),
                payload: payload.clone(),
                created_at: now,
                updated_at: now,
            };
            items.insert(0, item.clone());
            Ok(item)
        })?;
        info!(id = %item.id, name = %item.name, "saved template");
        Ok(item)
    }

    /// Rename a template. The renamed template moves to the front.
    pub fn rename(&self, id: Uuid, name: &str) -> Result<StyleTemplateItem, TemplateError> {
        let name = validate_name(name)?;
        let item = self.update(|items| {
            let index = items
                .iter()
                .position(|item| item.id == id)
                .ok_or(TemplateError::NotFound)?;
            let mut item = items.remove(index);
            item.name = name.clone();
            item.updated_at = Utc::now();
            items.insert(0, item.clone());
            Ok(item)
        })?;
        info!(id = %item.id, name = %item.name, "renamed template");
        Ok(item)
    }

    pub fn delete(&self, id: Uuid) -> Result<StyleTemplateItem, TemplateError> {
        let item = self.update(|items| {
            let index = items
                .iter()
                .position(|item| item.id == id)
                .ok_or(TemplateError::NotFound)?;
            Ok(items.remove(index))
        })?;
        info!(id = %item.id, "deleted template");
        Ok(item)
    }

    /// Read, change, and write the list, retrying when another writer got
    /// there first. A failing `change` leaves the stored list untouched.
    fn update<T>(
        &self,
        change: impl Fn(&mut Vec<StyleTemplateItem>) -> Result<T, TemplateError>,
    ) -> Result<T, TemplateError> {
        let mut attempt = 1;
        loop {
            let Versioned { version, mut items } = self.store.load()?;
            let out = change(&mut items)?;
            match self.store.save(version, &items) {
                Ok(_) => return Ok(out),
                Err(StoreError::Conflict { expected, found }) if attempt < MAX_ATTEMPTS => {
                    warn!(attempt, expected, found, "template list changed, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn library() -> TemplateLibrary<MemoryStore> {
        TemplateLibrary::new(MemoryStore::new())
    }

    #[test]
    fn test_name_validation() {
        assert_eq!(validate_name("  Sales  ").unwrap(), "Sales");
        assert!(matches!(validate_name(""), Err(TemplateError::InvalidName)));
        assert!(matches!(validate_name("   "), Err(TemplateError::InvalidName)));
        assert!(validate_name(&"가".repeat(40)).is_ok());
        assert!(validate_name(&"a".repeat(41)).is_err());
    }

    #[test]
    fn test_error_serializes_as_object() {
        let value = serde_json::to_value(TemplateError::InvalidName).unwrap();
        assert_eq!(value, json!({ "error": "Template name must be 1-40 chars." }));
    }

    #[test]
    fn test_most_recent_first() {
        let library = library();
        let first = library.save("First", StyleOverrides::default()).unwrap();
        let second = library.save("Second", StyleOverrides::default()).unwrap();

        let names: Vec<_> = library.list().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["Second", "First"]);

        let renamed = library.rename(first.id, "Renamed").unwrap();
        assert_eq!(renamed.created_at, first.created_at);
        let ids: Vec<_> = library.list().unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, [first.id, second.id]);
    }

    #[test]
    fn test_missing_ids() {
        let library = library();
        let id = Uuid::new_v4();
        assert!(matches!(library.rename(id, "x"), Err(TemplateError::NotFound)));
        assert!(matches!(library.delete(id), Err(TemplateError::NotFound)));
        assert!(matches!(library.get(id), Err(TemplateError::NotFound)));
    }

    /// Store whose first save always loses a race.
    struct Racy {
        inner: MemoryStore,
        raced: Cell<bool>,
    }

    impl TemplateStore for Racy {
        fn load(&self) -> Result<Versioned<Vec<StyleTemplateItem>>, StoreError> {
            self.inner.load()
        }

        fn save(&self, expected: u64, items: &[StyleTemplateItem]) -> Result<u64, StoreError> {
            if !self.raced.replace(true) {
                let other = TemplateLibrary::new(&self.inner);
                other
                    .save("Concurrent", StyleOverrides::default())
                    .map_err(|_| StoreError::Poisoned)?;
            }
            self.inner.save(expected, items)
        }
    }

    #[test]
    fn test_retries_after_conflict() {
        let library = TemplateLibrary::new(Racy {
            inner: MemoryStore::new(),
            raced: Cell::new(false),
        });
        library.save("Mine", StyleOverrides::default()).unwrap();
        let names: Vec<_> = library.list().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Mine".to_string()));
        assert!(names.contains(&"Concurrent".to_string()));
    }
}
