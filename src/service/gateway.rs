use async_trait::async_trait;

use crate::{
    error::AppError,
    model::{poll::MessageRef, view::PollView},
};

/// Outbound chat platform operations the poll engine relies on.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Posts a new copy of a poll display in `channel_id`.
    async fn post_poll(&self, channel_id: u64, view: &PollView) -> Result<MessageRef, AppError>;

    /// Replaces the content of an existing poll display.
    async fn edit_poll(&self, message: MessageRef, view: &PollView) -> Result<(), AppError>;

    async fn delete_message(&self, message: MessageRef) -> Result<(), AppError>;

    async fn message_exists(&self, message: MessageRef) -> Result<bool, AppError>;

    /// Ids of every non-bot member of the guild.
    async fn guild_member_ids(&self, guild_id: u64) -> Result<Vec<u64>, AppError>;
}

/// Link that opens a message in the client.
pub fn jump_url(guild_id: u64, message: MessageRef) -> String {
    format!(
        "https://discord.com/channels/{}/{}/{}",
        guild_id, message.channel_id, message.message_id
    )
}
