//! Poll lifecycle.
//!
//! Every mutating operation follows the same path: load the record, apply the
//! transition from `model::poll`, persist it, then `synchronize` so that every posted
//! copy of the poll shows the new state.

pub mod render;
pub mod sync;

#[cfg(test)]
mod test;

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use crate::{
    data::{kv::KvStore, poll::PollRepository},
    error::AppError,
    model::{
        poll::{
            check_max_selections, parse_options, CreatePollParams, EditPollParams, MessageRef,
            Poll, PollState,
        },
        view::PollView,
    },
    service::gateway::{jump_url, ChatGateway},
    util::parse::{parse_close_date, parse_option_patch},
};

use self::render::{render_poll, render_result};

pub struct PollService<'a> {
    store: &'a KvStore,
    gateway: Arc<dyn ChatGateway>,
    /// Timezone close dates are typed in.
    offset: FixedOffset,
}

fn not_found(title: &str) -> AppError {
    AppError::NotFound(format!("Poll \"{}\" does not exist!", title))
}

fn duplicate(title: &str) -> AppError {
    AppError::Validation(format!("Poll \"{}\" already exists!", title))
}

impl<'a> PollService<'a> {
    pub fn new(store: &'a KvStore, gateway: Arc<dyn ChatGateway>, offset: FixedOffset) -> Self {
        Self {
            store,
            gateway,
            offset,
        }
    }

    async fn load(&self, guild_id: u64, title: &str) -> Result<Poll, AppError> {
        PollRepository::new(self.store)
            .get(guild_id, title)
            .await?
            .ok_or_else(|| not_found(title))
    }

    fn parse_close_date(&self, input: Option<&str>) -> Result<Option<DateTime<FixedOffset>>, AppError> {
        input
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| parse_close_date(d, self.offset, Utc::now()))
            .transpose()
    }

    /// Creates a poll and posts its first display in the invoking channel.
    ///
    /// # Returns
    /// - `Ok(MessageRef)` - The posted display
    /// - `Err(AppError::Validation)` - Duplicate title, bad options, bad close date or
    ///   a selection cap below one; nothing is posted or stored
    /// - `Err(AppError)` - Posting or saving failed; a posted display is deleted again
    pub async fn create(&self, params: CreatePollParams) -> Result<MessageRef, AppError> {
        let repo = PollRepository::new(self.store);
        let title = params.title.trim();

        if title.is_empty() {
            return Err(AppError::Validation("Poll title cannot be empty.".to_string()));
        }
        if repo.exists(params.guild_id, title).await? {
            return Err(duplicate(title));
        }

        let options = parse_options(&params.options)?;
        let close_time = self.parse_close_date(params.close_date.as_deref())?;
        let max_selections = check_max_selections(params.max_selections)?;
        let mut poll = Poll::new(options, close_time, max_selections, params.show_voters)?;

        let message = self
            .gateway
            .post_poll(params.channel_id, &render_poll(title, &poll))
            .await?;
        poll.track(message);

        // Without a record the posted display could never be voted on or removed
        if let Err(e) = repo.save(params.guild_id, title, &poll).await {
            if let Err(delete_err) = self.gateway.delete_message(message).await {
                tracing::warn!(
                    "Failed to delete display of unsaved poll {:?}: {}",
                    title,
                    delete_err
                );
            }
            return Err(e);
        }

        tracing::info!("Created poll {:?} in guild {}", title, params.guild_id);

        Ok(message)
    }

    /// Edits a poll's settings, validating every change before applying any.
    ///
    /// # Returns
    /// - `Ok(String)` - The poll's title after the edit
    /// - `Err(AppError::NotFound)` - No poll with that title
    /// - `Err(AppError::Validation)` - Any malformed setting or a rename onto an
    ///   existing title; the stored poll is unchanged
    pub async fn edit(&self, params: EditPollParams) -> Result<String, AppError> {
        let repo = PollRepository::new(self.store);
        let title = params.title.trim();
        let mut poll = self.load(params.guild_id, title).await?;

        let patch = params
            .options
            .as_deref()
            .map(parse_option_patch)
            .transpose()?;
        let close_time = self.parse_close_date(params.close_date.as_deref())?;
        let max_selections = params.max_selections.map(check_max_selections).transpose()?;

        let new_title = match params.new_title.as_deref().map(str::trim) {
            Some("") => {
                return Err(AppError::Validation("new_title cannot be empty.".to_string()));
            }
            Some(new_title) if new_title != title => {
                if repo.exists(params.guild_id, new_title).await? {
                    return Err(duplicate(new_title));
                }
                Some(new_title)
            }
            _ => None,
        };

        if let Some(patch) = patch {
            poll.apply_option_patch(&patch)?;
        }
        if close_time.is_some() {
            poll.close_time = close_time;
        }
        if let Some(max_selections) = max_selections {
            poll.max_selections = max_selections;
        }
        if let Some(show_voters) = params.show_voters {
            poll.show_voters = show_voters;
        }

        let final_title = match new_title {
            Some(new_title) => {
                repo.save(params.guild_id, new_title, &poll).await?;
                repo.delete(params.guild_id, title).await?;
                tracing::info!(
                    "Renamed poll {:?} to {:?} in guild {}",
                    title,
                    new_title,
                    params.guild_id
                );
                new_title
            }
            None => {
                repo.save(params.guild_id, title, &poll).await?;
                title
            }
        };

        self.synchronize(params.guild_id, final_title, poll).await?;

        Ok(final_title.to_string())
    }

    /// Closes a poll by command.
    pub async fn close(&self, guild_id: u64, title: &str) -> Result<(), AppError> {
        let title = title.trim();
        let mut poll = self.load(guild_id, title).await?;

        poll.close(true);
        PollRepository::new(self.store)
            .save(guild_id, title, &poll)
            .await?;
        self.synchronize(guild_id, title, poll).await?;

        tracing::info!("Closed poll {:?} in guild {}", title, guild_id);
        Ok(())
    }

    /// Reopens a poll by command, optionally with a new deadline.
    pub async fn open(
        &self,
        guild_id: u64,
        title: &str,
        close_date: Option<&str>,
    ) -> Result<(), AppError> {
        let title = title.trim();
        let mut poll = self.load(guild_id, title).await?;
        let close_time = self.parse_close_date(close_date)?;

        poll.reopen(close_time, Utc::now());
        PollRepository::new(self.store)
            .save(guild_id, title, &poll)
            .await?;
        self.synchronize(guild_id, title, poll).await?;

        tracing::info!("Reopened poll {:?} in guild {}", title, guild_id);
        Ok(())
    }

    /// Deletes a poll and, best effort, every posted copy of it.
    pub async fn remove(&self, guild_id: u64, title: &str) -> Result<(), AppError> {
        let title = title.trim();
        let poll = self.load(guild_id, title).await?;

        for message in &poll.message_refs {
            if let Err(e) = self.gateway.delete_message(*message).await {
                tracing::debug!(
                    "Could not delete message {} of poll {:?}: {}",
                    message.message_id,
                    title,
                    e
                );
            }
        }

        PollRepository::new(self.store)
            .delete(guild_id, title)
            .await?;

        tracing::info!("Removed poll {:?} from guild {}", title, guild_id);
        Ok(())
    }

    /// Posts an additional copy of the poll in `channel_id`.
    pub async fn repost(
        &self,
        guild_id: u64,
        channel_id: u64,
        title: &str,
    ) -> Result<MessageRef, AppError> {
        let title = title.trim();
        let mut poll = self.load(guild_id, title).await?;

        let message = self
            .gateway
            .post_poll(channel_id, &render_poll(title, &poll))
            .await?;
        poll.track(message);
        PollRepository::new(self.store)
            .save(guild_id, title, &poll)
            .await?;

        Ok(message)
    }

    /// Records a selection made on the menu of `message_id`.
    ///
    /// # Returns
    /// - `Ok((title, labels))` - The poll voted on and the chosen option labels
    /// - `Err(AppError::NotFound)` - No poll in the guild tracks the message
    /// - `Err(AppError::PermissionDenied)` - The poll is closed
    pub async fn vote(
        &self,
        guild_id: u64,
        message_id: u64,
        voter_id: u64,
        indices: &[usize],
    ) -> Result<(String, Vec<String>), AppError> {
        let repo = PollRepository::new(self.store);
        let (title, mut poll) = repo
            .find_by_message(guild_id, message_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Voting failed, this poll no longer exists!".to_string())
            })?;

        poll.cast_vote(&voter_id.to_string(), indices)?;
        let labels = poll
            .labels(indices)
            .into_iter()
            .map(str::to_string)
            .collect();

        repo.save(guild_id, &title, &poll).await?;
        self.synchronize(guild_id, &title, poll).await?;

        Ok((title, labels))
    }

    /// Titles of the guild's polls in the given state.
    pub async fn list(&self, guild_id: u64, state: PollState) -> Result<Vec<String>, AppError> {
        let repo = PollRepository::new(self.store);
        let mut titles = Vec::new();

        for title in repo.titles(guild_id).await? {
            if let Some(poll) = repo.get(guild_id, &title).await? {
                if state.matches(&poll) {
                    titles.push(title);
                }
            }
        }

        Ok(titles)
    }

    pub async fn result(&self, guild_id: u64, title: &str) -> Result<PollView, AppError> {
        let title = title.trim();
        let poll = self.load(guild_id, title).await?;
        Ok(render_result(title, &poll))
    }

    /// Link to the newest posted copy of the poll that still exists.
    pub async fn jump_url(&self, guild_id: u64, title: &str) -> Result<String, AppError> {
        let title = title.trim();
        let poll = self.load(guild_id, title).await?;

        for message in poll.message_refs.iter().rev() {
            match self.gateway.message_exists(*message).await {
                Ok(true) => return Ok(jump_url(guild_id, *message)),
                Ok(false) => {}
                Err(e) => tracing::debug!("Could not fetch message {}: {}", message.message_id, e),
            }
        }

        Err(AppError::NotFound(format!(
            "Poll \"{}\" has no posted message! Use `/vote repost` to post it again.",
            title
        )))
    }

    /// Members of the guild who have not voted on the poll yet.
    pub async fn pending_voters(&self, guild_id: u64, title: &str) -> Result<Vec<u64>, AppError> {
        let title = title.trim();
        let poll = self.load(guild_id, title).await?;

        Ok(self
            .gateway
            .guild_member_ids(guild_id)
            .await?
            .into_iter()
            .filter(|id| !poll.votes.contains_key(&id.to_string()))
            .collect())
    }

    /// Drops every poll of a guild the bot has left.
    pub async fn remove_guild(&self, guild_id: u64) -> Result<usize, AppError> {
        let repo = PollRepository::new(self.store);
        let titles = repo.titles(guild_id).await?;

        for title in &titles {
            repo.delete(guild_id, title).await?;
        }

        Ok(titles.len())
    }

    /// Closes every open poll whose deadline is at or before `now`.
    ///
    /// A failure on one poll is logged and the sweep moves on to the next.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of polls closed by this sweep
    pub async fn close_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let repo = PollRepository::new(self.store);
        let mut closed = 0;

        for (guild_id, title) in repo.all_keys().await? {
            match self.close_if_expired(guild_id, &title, now).await {
                Ok(true) => closed += 1,
                Ok(false) => {}
                Err(e) => tracing::error!(
                    "Failed to close poll {:?} in guild {}: {}",
                    title,
                    guild_id,
                    e
                ),
            }
        }

        Ok(closed)
    }

    async fn close_if_expired(
        &self,
        guild_id: u64,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let repo = PollRepository::new(self.store);
        let Some(mut poll) = repo.get(guild_id, title).await? else {
            return Ok(false);
        };
        if !poll.is_expired(now) {
            return Ok(false);
        }

        poll.close(false);
        repo.save(guild_id, title, &poll).await?;
        self.synchronize(guild_id, title, poll).await?;

        tracing::info!("Poll {:?} in guild {} reached its deadline", title, guild_id);
        Ok(true)
    }
}
