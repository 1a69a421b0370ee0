use crate::{
    data::{kv::KvStore, response::ResponseRepository},
    error::AppError,
    model::response::ResponseTable,
};
use test_utils::builder::TestBuilder;

mod ensure;
mod save;

async fn store() -> KvStore {
    let test = TestBuilder::new().with_kv_tables().build().await.unwrap();
    KvStore::database(test.db.unwrap())
}
