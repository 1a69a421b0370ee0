use super::*;

/// Tests saving and deleting a guild's table.
///
/// Expected: Ok, then NotFound when deleting twice
#[tokio::test]
async fn saves_and_deletes_table() -> Result<(), AppError> {
    let store = store().await;
    let repo = ResponseRepository::new(&store);

    let mut table = ResponseTable::new();
    table.link(&["a".to_string()], &["x".to_string(), "y".to_string()])?;
    repo.save(7, &table).await?;
    assert_eq!(repo.get_or_default(7).await?, table);

    repo.delete(7).await?;
    assert_eq!(repo.get_or_default(7).await?, ResponseTable::new());
    assert!(matches!(repo.delete(7).await, Err(AppError::NotFound(_))));
    Ok(())
}
