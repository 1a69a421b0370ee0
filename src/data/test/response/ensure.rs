use super::*;

/// Tests creating the empty table for a newly joined guild.
///
/// Expected: Ok(true) then Ok(false) on the second call
#[tokio::test]
async fn creates_empty_table_once() -> Result<(), AppError> {
    let store = store().await;
    let repo = ResponseRepository::new(&store);

    assert!(repo.ensure(1).await?);
    assert!(!repo.ensure(1).await?);
    assert_eq!(repo.get(1).await?, Some(ResponseTable::new()));
    Ok(())
}

/// Tests that ensuring a table never wipes existing triggers.
///
/// Expected: Ok with the stored triggers intact
#[tokio::test]
async fn keeps_existing_table() -> Result<(), AppError> {
    let store = store().await;
    let repo = ResponseRepository::new(&store);

    let mut table = ResponseTable::new();
    table.link(&["hello".to_string()], &["hi".to_string()])?;
    repo.save(1, &table).await?;

    repo.ensure(1).await?;

    assert_eq!(repo.get(1).await?, Some(table));
    Ok(())
}
