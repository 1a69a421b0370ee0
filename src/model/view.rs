//! Platform-neutral display payload of a poll.
//!
//! Rendering produces a `PollView`; the bot layer turns it into an embed plus a select
//! menu. Keeping the payload plain data lets the poll engine be exercised without a
//! chat client.

/// Embed color of an open poll.
pub const OPEN_COLOR: u32 = 0x20B05C;
/// Embed color of a closed poll.
pub const CLOSED_COLOR: u32 = 0xD64933;
/// Embed color of a result listing.
pub const RESULT_COLOR: u32 = 0x07A0C3;

/// Component id of every poll select menu.
pub const VOTE_SELECT_ID: &str = "vote_select";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollField {
    pub name: String,
    pub value: String,
    pub vote_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSelect {
    pub custom_id: String,
    pub placeholder: String,
    /// `(label, value)` pairs; the value is the option index.
    pub options: Vec<(String, String)>,
    pub min_values: u8,
    pub max_values: u8,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollView {
    pub author: String,
    pub title: String,
    pub color: u32,
    pub fields: Vec<PollField>,
    pub footer: Option<String>,
    pub select: Option<PollSelect>,
}
