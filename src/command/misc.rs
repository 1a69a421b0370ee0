use poise::CreateReply;

use crate::{command::Context, error::AppError};

/// Check whether the bot is responsive
#[poise::command(slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), AppError> {
    let latency = ctx.ping().await;

    ctx.send(
        CreateReply::default()
            .content(format!("Pong! ({} ms)", latency.as_millis()))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}
