use rand::Rng;

use crate::{
    data::{kv::KvStore, response::ResponseRepository},
    error::AppError,
    model::response::ResponseGroup,
    util::parse::{escape_field, normalize_message, split_fields},
};

/// Discord caps a single embed field value at this many characters.
pub const FIELD_LIMIT: usize = 1024;

pub struct ResponseService<'a> {
    store: &'a KvStore,
}

impl<'a> ResponseService<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        Self { store }
    }

    /// Links every trigger in `triggers` to every response in `responses`.
    ///
    /// Both inputs are `|`-separated; triggers are matched case-insensitively.
    ///
    /// # Returns
    /// - `Ok(Vec<String>)` - The trigger words that were linked
    /// - `Err(AppError::Validation)` - No trigger or no response survived parsing
    pub async fn add(
        &self,
        guild_id: u64,
        triggers: &str,
        responses: &str,
    ) -> Result<Vec<String>, AppError> {
        let repo = ResponseRepository::new(self.store);
        let words = split_fields(&triggers.to_lowercase());
        let phrases = split_fields(responses);

        let mut table = repo.get_or_default(guild_id).await?;
        table.link(&words, &phrases)?;
        repo.save(guild_id, &table).await?;

        tracing::debug!("Linked {:?} to {:?} in guild {}", words, phrases, guild_id);

        Ok(words)
    }

    /// Removes triggers, or only their links to `responses` when given.
    ///
    /// # Returns
    /// - `Ok(Vec<String>)` - The trigger words that existed and were updated
    /// - `Err(AppError::NotFound)` - None of the triggers exist
    /// - `Err(AppError::Validation)` - `responses` names no stored response
    pub async fn remove(
        &self,
        guild_id: u64,
        triggers: &str,
        responses: Option<&str>,
    ) -> Result<Vec<String>, AppError> {
        let repo = ResponseRepository::new(self.store);
        let words = split_fields(&triggers.to_lowercase());
        let phrases = responses.map(split_fields).unwrap_or_default();

        let mut table = repo.get_or_default(guild_id).await?;
        let removed = table.unlink(&words, &phrases)?;
        repo.save(guild_id, &table).await?;

        Ok(removed)
    }

    /// Trigger groups of the guild, optionally limited to the given triggers.
    pub async fn show(
        &self,
        guild_id: u64,
        triggers: Option<&str>,
    ) -> Result<Vec<ResponseGroup>, AppError> {
        let filter = triggers
            .map(|t| split_fields(&t.to_lowercase()))
            .unwrap_or_default();

        let table = ResponseRepository::new(self.store)
            .get_or_default(guild_id)
            .await?;

        Ok(table.groups(&filter))
    }

    /// Builds the auto-reply for a chat message, if any trigger matches.
    pub async fn reply_for<R: Rng + ?Sized>(
        &self,
        guild_id: u64,
        content: &str,
        rng: &mut R,
    ) -> Result<Option<String>, AppError> {
        let Some(table) = ResponseRepository::new(self.store).get(guild_id).await? else {
            return Ok(None);
        };

        let replies = table.resolve(&normalize_message(content), rng);
        if replies.is_empty() {
            Ok(None)
        } else {
            Ok(Some(replies.join("\n")))
        }
    }

    pub async fn ensure_guild(&self, guild_id: u64) -> Result<bool, AppError> {
        ResponseRepository::new(self.store).ensure(guild_id).await
    }

    /// Drops the guild's table; a guild that never had one is not an error.
    pub async fn remove_guild(&self, guild_id: u64) -> Result<(), AppError> {
        match ResponseRepository::new(self.store).delete(guild_id).await {
            Ok(()) | Err(AppError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Formats trigger groups as `[ "w1", "w2" ]:` blocks followed by their responses,
/// packed into chunks that each fit in one embed field.
///
/// Words are shown escaped so they can be pasted back into a command.
pub fn format_groups(groups: &[ResponseGroup]) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for group in groups {
        let words: Vec<String> = group
            .words
            .iter()
            .map(|w| format!("\"{}\"", escape_field(w)))
            .collect();
        let mut block = format!("[ {} ]:", words.join(", "));
        for response in &group.responses {
            block.push('\n');
            block.push_str(response);
        }
        let block = truncate(&block, FIELD_LIMIT);

        if !current.is_empty() && current.len() + 2 + block.len() > FIELD_LIMIT {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(&block);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn truncate(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit - '…'.len_utf8();
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use test_utils::builder::TestBuilder;

    async fn store() -> KvStore {
        let test = TestBuilder::new().with_kv_tables().build().await.unwrap();
        KvStore::database(test.db.unwrap())
    }

    #[tokio::test]
    async fn add_then_reply() -> Result<(), AppError> {
        let store = store().await;
        let service = ResponseService::new(&store);
        let mut rng = StdRng::seed_from_u64(1);

        let added = service.add(1, "Hello|hey", "hi").await?;
        assert_eq!(added, vec!["hello", "hey"]);

        let reply = service.reply_for(1, "HELLO there", &mut rng).await?;
        assert_eq!(reply.as_deref(), Some("hi"));
        assert_eq!(service.reply_for(1, "nothing", &mut rng).await?, None);
        assert_eq!(service.reply_for(2, "hello", &mut rng).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn multiple_triggers_join_replies_with_newlines() -> Result<(), AppError> {
        let store = store().await;
        let service = ResponseService::new(&store);
        let mut rng = StdRng::seed_from_u64(1);

        service.add(1, "cat", "meow").await?;
        service.add(1, "dog", "woof").await?;

        let reply = service.reply_for(1, "cat vs dog", &mut rng).await?;
        assert_eq!(reply.as_deref(), Some("meow\nwoof"));
        Ok(())
    }

    #[tokio::test]
    async fn urls_do_not_trigger_replies() -> Result<(), AppError> {
        let store = store().await;
        let service = ResponseService::new(&store);
        let mut rng = StdRng::seed_from_u64(1);

        service.add(1, "example", "nice").await?;

        let reply = service
            .reply_for(1, "see https://example.com/page", &mut rng)
            .await?;
        assert_eq!(reply, None);
        Ok(())
    }

    #[tokio::test]
    async fn escaped_pipe_is_part_of_the_trigger() -> Result<(), AppError> {
        let store = store().await;
        let service = ResponseService::new(&store);
        let mut rng = StdRng::seed_from_u64(1);

        let added = service.add(1, r"a\|b", "pipe").await?;
        assert_eq!(added, vec!["a|b"]);
        assert_eq!(
            service.reply_for(1, r"type a\|b", &mut rng).await?.as_deref(),
            Some("pipe")
        );
        Ok(())
    }

    #[tokio::test]
    async fn removing_all_triggers_forgets_the_response() -> Result<(), AppError> {
        let store = store().await;
        let service = ResponseService::new(&store);
        let mut rng = StdRng::seed_from_u64(1);

        service.add(1, "hello|hey", "hi").await?;
        service.remove(1, "hello|hey", None).await?;

        assert_eq!(service.reply_for(1, "hello hey", &mut rng).await?, None);
        assert!(service.show(1, None).await?.is_empty());

        let err = service.remove(1, "hello", None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn add_without_responses_is_rejected() -> Result<(), AppError> {
        let store = store().await;
        let service = ResponseService::new(&store);

        let err = service.add(1, "hello", " | ").await.unwrap_err();
        assert_eq!(err.to_string(), "You did not enter any responses!");
        Ok(())
    }

    #[tokio::test]
    async fn guild_lifecycle() -> Result<(), AppError> {
        let store = store().await;
        let service = ResponseService::new(&store);

        assert!(service.ensure_guild(1).await?);
        service.add(1, "a", "b").await?;
        assert!(!service.ensure_guild(1).await?);

        service.remove_guild(1).await?;
        service.remove_guild(1).await?;
        assert!(service.show(1, None).await?.is_empty());
        Ok(())
    }

    #[test]
    fn format_groups_lists_words_then_responses() {
        let groups = vec![
            ResponseGroup {
                words: vec!["a".to_string(), "b".to_string()],
                responses: vec!["x".to_string(), "y".to_string()],
            },
            ResponseGroup {
                words: vec!["c".to_string()],
                responses: vec!["z".to_string()],
            },
        ];

        assert_eq!(
            format_groups(&groups),
            vec!["[ \"a\", \"b\" ]:\nx\ny\n\n[ \"c\" ]:\nz".to_string()]
        );
    }

    #[test]
    fn format_groups_escapes_words() {
        let groups = vec![ResponseGroup {
            words: vec!["a|b".to_string(), r"c\||".to_string()],
            responses: vec!["x".to_string()],
        }];

        assert_eq!(
            format_groups(&groups),
            vec![r#"[ "a\|b", "c\\||" ]:"#.to_string() + "\nx"]
        );
    }

    #[test]
    fn format_groups_splits_at_field_limit() {
        let long = "r".repeat(600);
        let groups: Vec<ResponseGroup> = (0..3)
            .map(|i| ResponseGroup {
                words: vec![format!("w{i}")],
                responses: vec![long.clone()],
            })
            .collect();

        let chunks = format_groups(&groups);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() <= FIELD_LIMIT));
    }
}
