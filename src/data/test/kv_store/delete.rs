use super::*;

/// Tests deleting an existing record.
///
/// Expected: Ok and the record is gone
#[tokio::test]
async fn deletes_existing_record() -> Result<(), AppError> {
    let store = database_store().await;
    store.set("response", &[], "42", &json!({})).await?;

    store.delete("response", &[], "42").await?;

    assert!(store.get::<serde_json::Value>("response", &[], "42").await?.is_none());
    Ok(())
}

/// Tests deleting a key that does not exist.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn fails_for_missing_record() {
    let store = database_store().await;

    let result = store.delete("response", &[], "42").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
