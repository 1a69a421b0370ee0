use super::*;

/// Tests reading a key that was never written.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_key() -> Result<(), AppError> {
    let store = database_store().await;

    let value: Option<serde_json::Value> = store.get("vote", &["1"], "missing").await?;

    assert!(value.is_none());
    Ok(())
}

/// Tests that a second write to the same key replaces the first.
///
/// Expected: Ok with the latest value
#[tokio::test]
async fn set_overwrites_existing_value() -> Result<(), AppError> {
    let store = database_store().await;

    store.set("vote", &["1"], "Lunch", &json!({ "closed": false })).await?;
    store.set("vote", &["1"], "Lunch", &json!({ "closed": true })).await?;

    let value: Option<serde_json::Value> = store.get("vote", &["1"], "Lunch").await?;
    assert_eq!(value, Some(json!({ "closed": true })));
    Ok(())
}

/// Tests that records under different tags do not collide.
///
/// Expected: Ok with each guild seeing its own record
#[tokio::test]
async fn tags_namespace_keys() -> Result<(), AppError> {
    let store = database_store().await;

    store.set("vote", &["1"], "Lunch", &json!(1)).await?;
    store.set("vote", &["2"], "Lunch", &json!(2)).await?;

    assert_eq!(store.get::<i32>("vote", &["1"], "Lunch").await?, Some(1));
    assert_eq!(store.get::<i32>("vote", &["2"], "Lunch").await?, Some(2));
    Ok(())
}

/// Tests reading a row written directly to the table.
///
/// Expected: Ok with the row's value decoded
#[tokio::test]
async fn reads_rows_inserted_externally() -> Result<(), AppError> {
    let test = TestBuilder::new().with_kv_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::kv_record::KvRecordFactory::new(db)
        .key("response_42")
        .value(json!({ "triggers": [], "responses": [] }))
        .build()
        .await?;

    let store = KvStore::database(db.clone());
    let value: Option<serde_json::Value> = store.get("response", &[], "42").await?;
    assert_eq!(value, Some(json!({ "triggers": [], "responses": [] })));
    Ok(())
}
