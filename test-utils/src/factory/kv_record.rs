//! Key-value record factory for seeding persisted state.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for inserting `kv_record` rows with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::kv_record::KvRecordFactory;
///
/// let record = KvRecordFactory::new(&db)
///     .key("response_123")
///     .value(serde_json::json!({ "triggers": [], "responses": [] }))
///     .build()
///     .await?;
/// ```
pub struct KvRecordFactory<'a> {
    db: &'a DatabaseConnection,
    key: String,
    value: serde_json::Value,
}

impl<'a> KvRecordFactory<'a> {
    /// Creates a new KvRecordFactory with default values.
    ///
    /// Defaults:
    /// - key: `"test_{id}"` where id is auto-incremented
    /// - value: `{}`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the row
    ///
    /// # Returns
    /// - `KvRecordFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            key: format!("test_{}", next_id()),
            value: serde_json::json!({}),
        }
    }

    /// Sets the composite key of the row.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the JSON value of the row.
    pub fn value(mut self, value: serde_json::Value) -> Self {
        self.value = value;
        self
    }

    /// Builds and inserts the row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::kv_record::Model)` - Inserted row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::kv_record::Model, DbErr> {
        entity::kv_record::ActiveModel {
            key: ActiveValue::Set(self.key),
            value: ActiveValue::Set(self.value),
            updated_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}
