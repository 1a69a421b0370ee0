use super::*;

/// Tests listing titles of one guild.
///
/// Expected: Ok with only that guild's titles
#[tokio::test]
async fn titles_are_scoped_to_guild() -> Result<(), AppError> {
    let store = store().await;
    let repo = PollRepository::new(&store);
    repo.save(1, "Lunch", &poll_with_message(10)).await?;
    repo.save(1, "Movie_night", &poll_with_message(11)).await?;
    repo.save(2, "Dinner", &poll_with_message(12)).await?;

    assert_eq!(repo.titles(1).await?, vec!["Lunch", "Movie_night"]);
    assert!(repo.exists(2, "Dinner").await?);
    assert!(!repo.exists(1, "Dinner").await?);
    Ok(())
}

/// Tests listing every poll across guilds for the scheduler sweep.
///
/// Expected: Ok with `(guild_id, title)` for every poll
#[tokio::test]
async fn all_keys_spans_guilds() -> Result<(), AppError> {
    let store = store().await;
    let repo = PollRepository::new(&store);
    repo.save(1, "Lunch", &poll_with_message(10)).await?;
    repo.save(2, "Dinner", &poll_with_message(12)).await?;

    assert_eq!(
        repo.all_keys().await?,
        vec![(1, "Lunch".to_string()), (2, "Dinner".to_string())]
    );
    Ok(())
}
