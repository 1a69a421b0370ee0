//! Tag-namespaced key-value persistence.
//!
//! Records are JSON values stored under a composite key built from a type tag, zero or
//! more caller tags and the record key. Each component is escaped (`%` → `%25`,
//! `_` → `%5F`) before being joined with `_`, so enumeration can always split a stored
//! key back into its exact components, even for poll titles containing underscores.
//!
//! Writes are last-writer-wins. There are no transactions and no version checks.

pub mod database;
pub mod file;

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::AppError;

pub use database::DatabaseBackend;
pub use file::FileBackend;

const SEPARATOR: char = '_';

/// Raw storage of escaped composite keys.
#[async_trait]
pub trait KvBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), AppError>;

    /// Removes `key`, returning whether it was present.
    async fn delete(&self, key: &str) -> Result<bool, AppError>;

    /// Every stored key starting with `prefix`.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, AppError>;
}

/// Typed access to a `KvBackend`, shared by every repository.
#[derive(Clone)]
pub struct KvStore {
    backend: Arc<dyn KvBackend>,
}

impl KvStore {
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn database(db: DatabaseConnection) -> Self {
        Self::new(DatabaseBackend::new(db))
    }

    pub async fn file(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        Ok(Self::new(FileBackend::open(path).await?))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        kind: &str,
        tags: &[&str],
        key: &str,
    ) -> Result<Option<T>, AppError> {
        match self.backend.get(&encode_key(kind, tags, key)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize>(
        &self,
        kind: &str,
        tags: &[&str],
        key: &str,
        value: &T,
    ) -> Result<(), AppError> {
        let value = serde_json::to_value(value)?;
        self.backend.set(&encode_key(kind, tags, key), value).await
    }

    /// Deletes a record.
    ///
    /// # Returns
    /// - `Ok(())` - The record existed and was removed
    /// - `Err(AppError::NotFound)` - No record is stored under the key
    pub async fn delete(&self, kind: &str, tags: &[&str], key: &str) -> Result<(), AppError> {
        let composite = encode_key(kind, tags, key);
        if self.backend.delete(&composite).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Key {} does not exist", composite)))
        }
    }

    /// Lists `(tags, key)` for every record of `kind` whose tags start with `tags`.
    ///
    /// The returned tags are all components between the type tag and the key, so a
    /// record stored with tags `[guild]` is reported as `(vec![guild], key)` whether
    /// enumerated with `[]` or `[guild]`.
    pub async fn enumerate(
        &self,
        kind: &str,
        tags: &[&str],
    ) -> Result<Vec<(Vec<String>, String)>, AppError> {
        let prefix = encode_prefix(kind, tags);

        let mut entries: Vec<(Vec<String>, String)> = self
            .backend
            .keys_with_prefix(&prefix)
            .await?
            .into_iter()
            .filter(|key| key.starts_with(&prefix))
            .filter_map(|key| decode_key(&key))
            .collect();

        entries.sort();
        Ok(entries)
    }
}

fn escape(component: &str) -> String {
    component.replace('%', "%25").replace('_', "%5F")
}

fn unescape(component: &str) -> Option<String> {
    let mut out = String::with_capacity(component.len());
    let mut rest = component;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let code = rest.get(pos + 1..pos + 3)?;
        match code {
            "25" => out.push('%'),
            "5F" => out.push('_'),
            _ => return None,
        }
        rest = &rest[pos + 3..];
    }
    out.push_str(rest);
    Some(out)
}

pub(crate) fn encode_key(kind: &str, tags: &[&str], key: &str) -> String {
    let mut composite = encode_prefix(kind, tags);
    composite.push_str(&escape(key));
    composite
}

fn encode_prefix(kind: &str, tags: &[&str]) -> String {
    let mut prefix = escape(kind);
    prefix.push(SEPARATOR);
    for tag in tags {
        prefix.push_str(&escape(tag));
        prefix.push(SEPARATOR);
    }
    prefix
}

/// Splits a composite key into `(tags, key)`, dropping the type tag.
fn decode_key(composite: &str) -> Option<(Vec<String>, String)> {
    let mut components = composite
        .split(SEPARATOR)
        .map(unescape)
        .collect::<Option<Vec<String>>>()?;

    if components.len() < 2 {
        return None;
    }
    let key = components.pop()?;
    components.remove(0);
    Some((components, key))
}
