//! Poll record and its state transitions.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    model::LinkMask,
    util::{
        bits::{bit_indices, mask_of},
        parse::DATETIME_FORMAT,
    },
};

/// Most options a poll may carry; one select menu entry per option.
pub const MAX_OPTIONS: usize = 25;

/// One posted copy of a poll display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel_id: u64,
    pub message_id: u64,
}

/// Filter for listing polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    #[default]
    All,
    Open,
    Closed,
}

impl PollState {
    pub fn matches(self, poll: &Poll) -> bool {
        match self {
            Self::All => true,
            Self::Open => !poll.closed,
            Self::Closed => poll.closed,
        }
    }
}

/// Authoritative state of one poll, independent of its posted copies.
///
/// `votes` maps a voter id to the mask of options it picked, bit `i` ⇔ `options[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub options: Vec<String>,
    pub close_time: Option<DateTime<FixedOffset>>,
    pub closed: bool,
    /// The current open/closed state came from an explicit command rather than the deadline.
    pub forced: bool,
    pub max_selections: u32,
    pub show_voters: bool,
    pub votes: BTreeMap<String, LinkMask>,
    pub message_refs: Vec<MessageRef>,
}

impl Poll {
    /// Creates an open poll with no votes and no posted copies yet.
    pub fn new(
        options: Vec<String>,
        close_time: Option<DateTime<FixedOffset>>,
        max_selections: u32,
        show_voters: bool,
    ) -> Result<Self, AppError> {
        check_option_count(options.len())?;
        if max_selections == 0 {
            return Err(max_selections_error());
        }

        Ok(Self {
            options,
            close_time,
            closed: false,
            forced: false,
            max_selections,
            show_voters,
            votes: BTreeMap::new(),
            message_refs: Vec::new(),
        })
    }

    /// Applies an `index:label` patch in ascending index order.
    ///
    /// An index at or past the current end appends, any other index overwrites in place.
    /// The poll is left untouched if the result would exceed `MAX_OPTIONS`.
    pub fn apply_option_patch(&mut self, patch: &[(usize, String)]) -> Result<(), AppError> {
        let mut options = self.options.clone();
        let mut sorted: Vec<&(usize, String)> = patch.iter().collect();
        sorted.sort_by_key(|(index, _)| *index);

        for (index, label) in sorted {
            match options.get_mut(*index) {
                Some(option) => *option = label.clone(),
                None => options.push(label.clone()),
            }
        }

        check_option_count(options.len())?;
        self.options = options;
        Ok(())
    }

    /// Replaces `voter`'s selection with the given option indices.
    ///
    /// # Returns
    /// - `Ok(())` - The vote was recorded
    /// - `Err(AppError::PermissionDenied)` - The poll is closed
    /// - `Err(AppError::Validation)` - No selection or an index with no matching option
    pub fn cast_vote(&mut self, voter: &str, indices: &[usize]) -> Result<(), AppError> {
        if self.closed {
            return Err(AppError::PermissionDenied(
                "Voting failed, this poll is already closed!".to_string(),
            ));
        }
        if indices.is_empty() {
            return Err(AppError::Validation("Pick at least one option.".to_string()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= self.options.len()) {
            return Err(AppError::Validation(format!(
                "Option {} does not exist on this poll.",
                index
            )));
        }

        self.votes.insert(voter.to_string(), mask_of(indices.iter().copied()));
        Ok(())
    }

    /// Voter ids whose selection includes option `index`.
    pub fn voters_for(&self, index: usize) -> Vec<&str> {
        self.votes
            .iter()
            .filter(|(_, &mask)| bit_indices(mask).any(|i| i == index))
            .map(|(voter, _)| voter.as_str())
            .collect()
    }

    /// Each option label paired with the voters who picked it.
    pub fn tally(&self) -> Vec<(&str, Vec<&str>)> {
        self.options
            .iter()
            .enumerate()
            .map(|(index, label)| (label.as_str(), self.voters_for(index)))
            .collect()
    }

    /// Labels of the options in `indices`, skipping unknown ones.
    pub fn labels(&self, indices: &[usize]) -> Vec<&str> {
        indices
            .iter()
            .filter_map(|&i| self.options.get(i))
            .map(String::as_str)
            .collect()
    }

    pub fn close(&mut self, forced: bool) {
        self.closed = true;
        self.forced = forced;
    }

    /// Reopens the poll by command.
    ///
    /// Without a new deadline an already elapsed `close_time` is cleared so the
    /// scheduler does not immediately close the poll again.
    pub fn reopen(&mut self, close_time: Option<DateTime<FixedOffset>>, now: DateTime<Utc>) {
        self.closed = false;
        self.forced = true;
        match close_time {
            Some(close_time) => self.close_time = Some(close_time),
            None => {
                if self.close_time.is_some_and(|t| t <= now) {
                    self.close_time = None;
                }
            }
        }
    }

    /// Open with a deadline at or before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.closed && self.close_time.is_some_and(|t| t <= now)
    }

    pub fn track(&mut self, message: MessageRef) {
        if !self.message_refs.contains(&message) {
            self.message_refs.push(message);
        }
    }

    /// Status line shown under the last option, wrapped in a code block that is red
    /// (`diff`) when closed and green (`yaml`) when open.
    pub fn status_text(&self) -> String {
        let date = self
            .close_time
            .map(|t| t.format(DATETIME_FORMAT).to_string());

        let line = match (self.closed, self.forced, date) {
            (true, true, Some(date)) => format!("Closed manually, originally closing at {}", date),
            (true, true, None) => "Closed manually".to_string(),
            (true, false, Some(date)) => format!("Closed at {}", date),
            (true, false, None) => "Closed".to_string(),
            (false, true, Some(date)) => format!("Reopened, closing at {}", date),
            (false, true, None) => "Reopened, no closing date".to_string(),
            (false, false, Some(date)) => format!("Closing at {}", date),
            (false, false, None) => "No closing date".to_string(),
        };

        let lang = if self.closed { "diff" } else { "yaml" };
        format!("```{}\n- {} -\n```", lang, line)
    }
}

/// Raw command input for creating a poll.
#[derive(Debug, Clone)]
pub struct CreatePollParams {
    pub guild_id: u64,
    pub channel_id: u64,
    pub title: String,
    /// `|`-separated option labels.
    pub options: String,
    pub close_date: Option<String>,
    pub max_selections: i64,
    pub show_voters: bool,
}

/// Raw command input for editing a poll; `None` leaves the setting unchanged.
#[derive(Debug, Clone, Default)]
pub struct EditPollParams {
    pub guild_id: u64,
    pub title: String,
    pub new_title: Option<String>,
    /// `index:label` pairs separated by `|`.
    pub options: Option<String>,
    pub close_date: Option<String>,
    pub max_selections: Option<i64>,
    pub show_voters: Option<bool>,
}

/// Splits `A|B|C` into trimmed option labels.
pub fn parse_options(input: &str) -> Result<Vec<String>, AppError> {
    let options: Vec<String> = input.split('|').map(|o| o.trim().to_string()).collect();
    if options.iter().any(String::is_empty) {
        return Err(AppError::Validation(
            "Option labels cannot be empty. (format: Option A|Option B)".to_string(),
        ));
    }
    check_option_count(options.len())?;
    Ok(options)
}

/// Converts a user-supplied selection cap, rejecting anything below one.
pub fn check_max_selections(value: i64) -> Result<u32, AppError> {
    match u32::try_from(value) {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(max_selections_error()),
    }
}

fn max_selections_error() -> AppError {
    AppError::Validation("max_selections must be at least 1.".to_string())
}

fn check_option_count(count: usize) -> Result<(), AppError> {
    if count == 0 || count > MAX_OPTIONS {
        return Err(AppError::Validation(format!(
            "A poll needs between 1 and {} options.",
            MAX_OPTIONS
        )));
    }
    Ok(())
}
