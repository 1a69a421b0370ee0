use std::{collections::HashSet, sync::Arc};

use tokio::task::JoinSet;

use crate::{
    data::poll::PollRepository,
    error::AppError,
    model::poll::{MessageRef, Poll},
    service::poll::{render::render_poll, PollService},
};

impl PollService<'_> {
    /// Pushes the current state of `poll` to every posted copy.
    ///
    /// The display is rendered once and every edit runs as its own task; the call
    /// returns once all of them have settled. Copies whose edit failed (deleted by a
    /// member, channel gone, permissions lost) are dropped from `message_refs` and the
    /// pruned record is persisted.
    ///
    /// # Returns
    /// - `Ok(Poll)` - The poll with only the reachable message references
    pub async fn synchronize(
        &self,
        guild_id: u64,
        title: &str,
        mut poll: Poll,
    ) -> Result<Poll, AppError> {
        let view = Arc::new(render_poll(title, &poll));
        let mut edits = JoinSet::new();

        for message in poll.message_refs.iter().copied() {
            let gateway = self.gateway.clone();
            let view = view.clone();
            edits.spawn(async move {
                match gateway.edit_poll(message, &view).await {
                    Ok(()) => (message, true),
                    Err(e) => {
                        tracing::debug!(
                            "Failed to edit poll message {} in channel {}: {}",
                            message.message_id,
                            message.channel_id,
                            e
                        );
                        (message, false)
                    }
                }
            });
        }

        let mut stale: HashSet<MessageRef> = HashSet::new();
        while let Some(result) = edits.join_next().await {
            match result {
                Ok((message, false)) => {
                    stale.insert(message);
                }
                Ok((_, true)) => {}
                // a panicked edit says nothing about the message itself, keep it
                Err(e) => tracing::error!("Poll message edit task failed: {}", e),
            }
        }

        if !stale.is_empty() {
            poll.message_refs.retain(|m| !stale.contains(m));
            PollRepository::new(self.store)
                .save(guild_id, title, &poll)
                .await?;

            tracing::info!(
                "Dropped {} unreachable message(s) of poll {:?} in guild {}",
                stale.len(),
                title,
                guild_id
            );
        }

        Ok(poll)
    }
}
