//! Slash commands and the command dispatch boundary.
//!
//! Commands return `AppError` directly. `on_error` is the single place a failed command
//! turns into a reply: user-facing errors are sent back privately with their message,
//! anything else is logged and answered with a generic apology.

pub mod misc;
pub mod response;
pub mod vote;

use std::sync::Arc;

use poise::CreateReply;

use crate::{
    bot::gateway::SerenityGateway, error::AppError, service::poll::PollService,
    state::AppState,
};

pub type Data = AppState;
pub type Context<'a> = poise::Context<'a, Data, AppError>;

/// Reply sent for errors that must not leak details.
const INTERNAL_ERROR_REPLY: &str = "Something went wrong, please try again later.";

/// Every command registered with Discord.
pub fn commands() -> Vec<poise::Command<Data, AppError>> {
    vec![misc::ping(), response::response(), vote::vote()]
}

/// Text shown to the user for a failed command or interaction.
///
/// Internal errors are logged here with full detail.
pub fn error_reply(error: &AppError) -> String {
    match error.user_message() {
        Some(message) => {
            tracing::debug!("Rejected request: {}", message);
            message
        }
        None => {
            tracing::error!("Internal error while handling request: {:?}", error);
            INTERNAL_ERROR_REPLY.to_string()
        }
    }
}

pub async fn on_error(error: poise::FrameworkError<'_, Data, AppError>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Failed to set up commands: {:?}", error)
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = CreateReply::default()
                .content(error_reply(&error))
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                tracing::error!(
                    "Failed to report error of command `{}`: {}",
                    ctx.command().qualified_name,
                    e
                );
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {}", e)
            }
        }
    }
}

fn guild_id(ctx: &Context<'_>) -> Result<u64, AppError> {
    ctx.guild_id()
        .map(|id| id.get())
        .ok_or_else(|| AppError::Validation("This command only works inside a server.".to_string()))
}

fn poll_service<'a>(ctx: &Context<'a>) -> PollService<'a> {
    let data = ctx.data();
    PollService::new(
        &data.store,
        Arc::new(SerenityGateway::new(ctx.serenity_context().http.clone())),
        data.utc_offset,
    )
}
