use super::*;

/// Tests enumerating every record of a type across tags.
///
/// Expected: Ok with `(tags, key)` for each record, other types excluded
#[tokio::test]
async fn lists_all_records_of_a_type() -> Result<(), AppError> {
    let store = database_store().await;
    store.set("vote", &["1"], "Lunch", &json!({})).await?;
    store.set("vote", &["2"], "Dinner", &json!({})).await?;
    store.set("response", &[], "1", &json!({})).await?;

    let entries = store.enumerate("vote", &[]).await?;

    assert_eq!(
        entries,
        vec![
            (vec!["1".to_string()], "Lunch".to_string()),
            (vec!["2".to_string()], "Dinner".to_string()),
        ]
    );
    Ok(())
}

/// Tests that a tag filter only matches whole tag components.
///
/// Guild `1` must not pick up records of guild `12`, and the `_` wildcard of `LIKE`
/// must not let `1X` match either.
///
/// Expected: Ok with only guild 1's records
#[tokio::test]
async fn filters_by_exact_tag() -> Result<(), AppError> {
    let store = database_store().await;
    store.set("vote", &["1"], "Lunch", &json!({})).await?;
    store.set("vote", &["12"], "Other", &json!({})).await?;
    store.set("vote", &["1X"], "Wild", &json!({})).await?;

    let entries = store.enumerate("vote", &["1"]).await?;

    assert_eq!(entries, vec![(vec!["1".to_string()], "Lunch".to_string())]);
    Ok(())
}

/// Tests that keys containing the separator come back intact.
///
/// Expected: Ok with the original title
#[tokio::test]
async fn preserves_underscores_in_keys() -> Result<(), AppError> {
    let store = database_store().await;
    store.set("vote", &["1"], "team_lunch_100%", &json!({})).await?;

    let entries = store.enumerate("vote", &["1"]).await?;

    assert_eq!(entries[0].1, "team_lunch_100%");
    Ok(())
}
