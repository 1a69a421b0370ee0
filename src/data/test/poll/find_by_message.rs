use super::*;

/// Tests resolving the poll behind a select menu message.
///
/// Expected: Ok(Some) with the tracking poll's title
#[tokio::test]
async fn finds_poll_tracking_message() -> Result<(), AppError> {
    let store = store().await;
    let repo = PollRepository::new(&store);
    repo.save(1, "Lunch", &poll_with_message(10)).await?;
    repo.save(1, "Dinner", &poll_with_message(20)).await?;

    let found = repo.find_by_message(1, 20).await?;

    assert_eq!(found.map(|(title, _)| title), Some("Dinner".to_string()));
    Ok(())
}

/// Tests a message id no poll in the guild tracks.
///
/// Expected: Ok(None), including for a poll of another guild
#[tokio::test]
async fn returns_none_for_untracked_message() -> Result<(), AppError> {
    let store = store().await;
    let repo = PollRepository::new(&store);
    repo.save(2, "Lunch", &poll_with_message(10)).await?;

    assert!(repo.find_by_message(1, 10).await?.is_none());
    Ok(())
}
