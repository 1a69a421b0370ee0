use crate::{data::kv::KvStore, error::AppError, model::poll::Poll};

/// Type tag of poll records, tagged with the guild id and keyed by title.
const KIND: &str = "vote";

pub struct PollRepository<'a> {
    store: &'a KvStore,
}

impl<'a> PollRepository<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        Self { store }
    }

    pub async fn get(&self, guild_id: u64, title: &str) -> Result<Option<Poll>, AppError> {
        self.store.get(KIND, &[&guild_id.to_string()], title).await
    }

    pub async fn exists(&self, guild_id: u64, title: &str) -> Result<bool, AppError> {
        Ok(self.get(guild_id, title).await?.is_some())
    }

    pub async fn save(&self, guild_id: u64, title: &str, poll: &Poll) -> Result<(), AppError> {
        self.store
            .set(KIND, &[&guild_id.to_string()], title, poll)
            .await
    }

    pub async fn delete(&self, guild_id: u64, title: &str) -> Result<(), AppError> {
        self.store
            .delete(KIND, &[&guild_id.to_string()], title)
            .await
    }

    /// Titles of every poll in the guild, sorted.
    pub async fn titles(&self, guild_id: u64) -> Result<Vec<String>, AppError> {
        Ok(self
            .store
            .enumerate(KIND, &[&guild_id.to_string()])
            .await?
            .into_iter()
            .map(|(_, title)| title)
            .collect())
    }

    /// Every `(guild_id, title)` pair across all guilds.
    ///
    /// Records whose guild tag is not a valid id are skipped with a warning.
    pub async fn all_keys(&self) -> Result<Vec<(u64, String)>, AppError> {
        let entries = self.store.enumerate(KIND, &[]).await?;

        Ok(entries
            .into_iter()
            .filter_map(|(tags, title)| {
                match tags.first().and_then(|tag| tag.parse::<u64>().ok()) {
                    Some(guild_id) => Some((guild_id, title)),
                    None => {
                        tracing::warn!("Skipping poll {:?} with malformed tags {:?}", title, tags);
                        None
                    }
                }
            })
            .collect())
    }

    /// Finds the poll in the guild that tracks `message_id`.
    pub async fn find_by_message(
        &self,
        guild_id: u64,
        message_id: u64,
    ) -> Result<Option<(String, Poll)>, AppError> {
        for title in self.titles(guild_id).await? {
            let Some(poll) = self.get(guild_id, &title).await? else {
                continue;
            };
            if poll.message_refs.iter().any(|m| m.message_id == message_id) {
                return Ok(Some((title, poll)));
            }
        }
        Ok(None)
    }
}
