use std::sync::Arc;

use async_trait::async_trait;
use serenity::{
    all::{ChannelId, CreateMessage, EditMessage, GuildId, MessageId},
    http::{Http, HttpError},
};

use crate::{
    bot::view::{build_components, build_embed},
    error::AppError,
    model::{poll::MessageRef, view::PollView},
    service::gateway::ChatGateway,
};

/// Page size of the guild member listing endpoint.
const MEMBER_PAGE: u64 = 1000;

/// `ChatGateway` backed by the bot's shared HTTP client.
pub struct SerenityGateway {
    http: Arc<Http>,
}

impl SerenityGateway {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn is_not_found(err: &serenity::Error) -> bool {
    matches!(
        err,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 404
    )
}

#[async_trait]
impl ChatGateway for SerenityGateway {
    async fn post_poll(&self, channel_id: u64, view: &PollView) -> Result<MessageRef, AppError> {
        let message = CreateMessage::new()
            .embed(build_embed(view))
            .components(build_components(view));

        let posted = ChannelId::new(channel_id)
            .send_message(&self.http, message)
            .await?;

        Ok(MessageRef {
            channel_id,
            message_id: posted.id.get(),
        })
    }

    async fn edit_poll(&self, message: MessageRef, view: &PollView) -> Result<(), AppError> {
        let edit = EditMessage::new()
            .embed(build_embed(view))
            .components(build_components(view));

        ChannelId::new(message.channel_id)
            .edit_message(&self.http, MessageId::new(message.message_id), edit)
            .await?;

        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), AppError> {
        ChannelId::new(message.channel_id)
            .delete_message(&self.http, MessageId::new(message.message_id))
            .await?;

        Ok(())
    }

    async fn message_exists(&self, message: MessageRef) -> Result<bool, AppError> {
        match self
            .http
            .get_message(
                ChannelId::new(message.channel_id),
                MessageId::new(message.message_id),
            )
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn guild_member_ids(&self, guild_id: u64) -> Result<Vec<u64>, AppError> {
        let mut ids = Vec::new();
        let mut after = None;

        loop {
            let page = self
                .http
                .get_guild_members(GuildId::new(guild_id), Some(MEMBER_PAGE), after)
                .await?;

            after = page.last().map(|m| m.user.id.get());
            ids.extend(page.iter().filter(|m| !m.user.bot).map(|m| m.user.id.get()));

            if (page.len() as u64) < MEMBER_PAGE {
                break;
            }
        }

        tracing::debug!("Fetched {} members of guild {}", ids.len(), guild_id);

        Ok(ids)
    }
}
