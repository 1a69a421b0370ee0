use std::{collections::BTreeMap, path::PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{data::kv::KvBackend, error::AppError};

/// Stores every record in a single pretty-printed JSON object on disk.
///
/// The whole map is held in memory and the file is rewritten after each mutation. A
/// mutation whose write fails is rolled back so memory never runs ahead of the file.
pub struct FileBackend {
    path: PathBuf,
    records: RwLock<BTreeMap<String, Value>>,
}

impl FileBackend {
    /// Loads `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Loaded {} records from {}", records.len(), path.display());

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    async fn flush(&self, records: &BTreeMap<String, Value>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(records)?).await?;
        Ok(())
    }
}

#[async_trait]
impl KvBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        let previous = records.insert(key.to_string(), value);

        if let Err(e) = self.flush(&records).await {
            match previous {
                Some(previous) => records.insert(key.to_string(), previous),
                None => records.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        let Some(previous) = records.remove(key) else {
            return Ok(false);
        };

        if let Err(e) = self.flush(&records).await {
            records.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(true)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .records
            .read()
            .await
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }
}
