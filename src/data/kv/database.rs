use async_trait::async_trait;
use chrono::Utc;
use migration::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use serde_json::Value;

use crate::{data::kv::KvBackend, error::AppError};

/// Stores records in the `kv_record` table.
pub struct DatabaseBackend {
    db: DatabaseConnection,
}

impl DatabaseBackend {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KvBackend for DatabaseBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let record = entity::prelude::KvRecord::find_by_id(key.to_string())
            .one(&self.db)
            .await?;

        Ok(record.map(|r| r.value))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), AppError> {
        entity::prelude::KvRecord::insert(entity::kv_record::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value),
            updated_at: ActiveValue::Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(entity::kv_record::Column::Key)
                .update_columns([
                    entity::kv_record::Column::Value,
                    entity::kv_record::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec(&self.db)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, AppError> {
        let result = entity::prelude::KvRecord::delete_by_id(key.to_string())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// `LIKE` treats `_` and `%` as wildcards, so the scan may over-match; the caller
    /// re-checks the literal prefix.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        let keys = entity::prelude::KvRecord::find()
            .select_only()
            .column(entity::kv_record::Column::Key)
            .filter(entity::kv_record::Column::Key.starts_with(prefix))
            .into_tuple::<String>()
            .all(&self.db)
            .await?;

        Ok(keys)
    }
}
