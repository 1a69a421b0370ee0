use super::*;

/// Tests that records written through the file backend survive a reopen.
///
/// Expected: Ok with the record read back from disk
#[tokio::test]
async fn persists_across_reopen() -> Result<(), AppError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("store.json");

    let store = KvStore::file(&path).await?;
    store.set("vote", &["1"], "Lunch", &json!({ "closed": true })).await?;
    drop(store);

    let reopened = KvStore::file(&path).await?;
    let value: Option<serde_json::Value> = reopened.get("vote", &["1"], "Lunch").await?;
    assert_eq!(value, Some(json!({ "closed": true })));
    Ok(())
}

/// Tests the on-disk shape of the file.
///
/// Expected: Ok with a single JSON object keyed by composite key
#[tokio::test]
async fn writes_single_json_object() -> Result<(), AppError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("store.json");

    let store = KvStore::file(&path).await?;
    store.set("vote", &["1"], "a_b", &json!(1)).await?;

    let contents: serde_json::Value = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
    assert_eq!(contents, json!({ "vote_1_a%5Fb": 1 }));
    Ok(())
}

/// Tests delete and enumerate on the file backend.
///
/// Expected: Ok with NotFound on the second delete
#[tokio::test]
async fn deletes_and_enumerates() -> Result<(), AppError> {
    let dir = tempfile::tempdir()?;
    let store = KvStore::file(dir.path().join("store.json")).await?;
    store.set("vote", &["1"], "A", &json!({})).await?;
    store.set("vote", &["1"], "B", &json!({})).await?;
    store.set("vote", &["2"], "C", &json!({})).await?;

    store.delete("vote", &["1"], "A").await?;
    assert!(matches!(
        store.delete("vote", &["1"], "A").await,
        Err(AppError::NotFound(_))
    ));

    let entries = store.enumerate("vote", &["1"]).await?;
    assert_eq!(entries, vec![(vec!["1".to_string()], "B".to_string())]);
    Ok(())
}

/// Tests that a write the file backend cannot persist leaves memory unchanged.
///
/// The data directory is swapped for a plain file after the first write, so every
/// later flush fails.
///
/// Expected: Err for the failed set and delete, with reads still showing the
/// last persisted state
#[tokio::test]
async fn failed_flush_rolls_back() -> Result<(), AppError> {
    let dir = tempfile::tempdir()?;
    let data_dir = dir.path().join("data");
    let store = KvStore::file(data_dir.join("store.json")).await?;
    store.set("vote", &["1"], "Kept", &json!({ "closed": false })).await?;

    tokio::fs::remove_dir_all(&data_dir).await?;
    tokio::fs::write(&data_dir, b"not a directory").await?;

    assert!(store.set("vote", &["1"], "New", &json!({})).await.is_err());
    let new: Option<serde_json::Value> = store.get("vote", &["1"], "New").await?;
    assert_eq!(new, None);

    assert!(store
        .set("vote", &["1"], "Kept", &json!({ "closed": true }))
        .await
        .is_err());
    assert!(store.delete("vote", &["1"], "Kept").await.is_err());
    let kept: Option<serde_json::Value> = store.get("vote", &["1"], "Kept").await?;
    assert_eq!(kept, Some(json!({ "closed": false })));
    Ok(())
}
