use crate::{data::kv::KvStore, error::AppError, model::response::ResponseTable};

/// Type tag of trigger-response records, keyed by guild id.
const KIND: &str = "response";

pub struct ResponseRepository<'a> {
    store: &'a KvStore,
}

impl<'a> ResponseRepository<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        Self { store }
    }

    pub async fn get(&self, guild_id: u64) -> Result<Option<ResponseTable>, AppError> {
        self.store.get(KIND, &[], &guild_id.to_string()).await
    }

    /// Gets the guild's table, or an empty one if none was stored yet.
    pub async fn get_or_default(&self, guild_id: u64) -> Result<ResponseTable, AppError> {
        Ok(self.get(guild_id).await?.unwrap_or_default())
    }

    pub async fn save(&self, guild_id: u64, table: &ResponseTable) -> Result<(), AppError> {
        self.store.set(KIND, &[], &guild_id.to_string(), table).await
    }

    /// Stores an empty table for the guild unless one exists.
    ///
    /// # Returns
    /// - `Ok(true)` - A new empty table was created
    /// - `Ok(false)` - The guild already had a table
    pub async fn ensure(&self, guild_id: u64) -> Result<bool, AppError> {
        if self.get(guild_id).await?.is_some() {
            return Ok(false);
        }
        self.save(guild_id, &ResponseTable::new()).await?;
        Ok(true)
    }

    pub async fn delete(&self, guild_id: u64) -> Result<(), AppError> {
        self.store.delete(KIND, &[], &guild_id.to_string()).await
    }
}
