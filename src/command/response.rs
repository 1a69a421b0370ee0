use poise::CreateReply;
use serenity::all::CreateEmbed;

use crate::{
    command::{guild_id, Context},
    error::AppError,
    model::view::RESULT_COLOR,
    service::response::{format_groups, ResponseService},
};

const MAX_EMBED_FIELDS: usize = 25;

/// Manage the bot's automatic replies
#[poise::command(
    slash_command,
    guild_only,
    subcommands("add", "remove", "show"),
    subcommand_required
)]
pub async fn response(_ctx: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Link triggers to responses
#[poise::command(slash_command, guild_only)]
async fn add(
    ctx: Context<'_>,
    #[description = "Trigger words separated by |"] triggers: String,
    #[description = "Responses separated by |"] responses: String,
    #[description = "Only you can see the confirmation"] hide: Option<bool>,
) -> Result<(), AppError> {
    let guild_id = guild_id(&ctx)?;
    let words = ResponseService::new(&ctx.data().store)
        .add(guild_id, &triggers, &responses)
        .await?;

    ctx.send(
        CreateReply::default()
            .content(format!("{} are successfully added!", quote_all(&words)))
            .ephemeral(hide.unwrap_or(false)),
    )
    .await?;

    Ok(())
}

/// Remove triggers, or only some of their responses
#[poise::command(slash_command, guild_only)]
async fn remove(
    ctx: Context<'_>,
    #[description = "Trigger words separated by |"] triggers: String,
    #[description = "Only unlink these responses, separated by |"] responses: Option<String>,
    #[description = "Only you can see the confirmation"] hide: Option<bool>,
) -> Result<(), AppError> {
    let guild_id = guild_id(&ctx)?;
    let words = ResponseService::new(&ctx.data().store)
        .remove(guild_id, &triggers, responses.as_deref())
        .await?;

    ctx.send(
        CreateReply::default()
            .content(format!("{} are successfully removed!", quote_all(&words)))
            .ephemeral(hide.unwrap_or(false)),
    )
    .await?;

    Ok(())
}

/// Show triggers and the responses they are linked to
#[poise::command(slash_command, guild_only)]
async fn show(
    ctx: Context<'_>,
    #[description = "Only show these triggers, separated by |"] triggers: Option<String>,
) -> Result<(), AppError> {
    let guild_id = guild_id(&ctx)?;
    let groups = ResponseService::new(&ctx.data().store)
        .show(guild_id, triggers.as_deref())
        .await?;

    let mut embed = CreateEmbed::new().title("Responses").color(RESULT_COLOR);
    if groups.is_empty() {
        let description = match triggers.as_deref() {
            Some(triggers) => format!("No result of {}", triggers),
            None => "No result of any trigger".to_string(),
        };
        embed = embed.description(description);
    } else {
        for chunk in format_groups(&groups).into_iter().take(MAX_EMBED_FIELDS) {
            embed = embed.field("\u{200b}", chunk, false);
        }
    }

    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}

fn quote_all(words: &[String]) -> String {
    words
        .iter()
        .map(|w| format!("\"{}\"", w))
        .collect::<Vec<_>>()
        .join(", ")
}
