use crate::{data::kv::KvStore, error::AppError};
use entity::prelude::KvRecord;
use serde_json::json;
use test_utils::{builder::TestBuilder, factory};

mod delete;
mod enumerate;
mod file_backend;
mod get_set;

/// Builds a store over an in-memory SQLite `kv_record` table.
async fn database_store() -> KvStore {
    let test = TestBuilder::new()
        .with_table(KvRecord)
        .build()
        .await
        .unwrap();
    KvStore::database(test.db.unwrap())
}
