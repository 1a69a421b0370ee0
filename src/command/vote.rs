use poise::CreateReply;

use crate::{
    bot::view::build_embed,
    command::{guild_id, poll_service, Context},
    error::AppError,
    model::poll::{CreatePollParams, EditPollParams, PollState},
};

/// Discord rejects message content above this length.
const MESSAGE_LIMIT: usize = 2000;

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum StateChoice {
    #[name = "all"]
    All,
    #[name = "open"]
    Open,
    #[name = "closed"]
    Closed,
}

impl From<StateChoice> for PollState {
    fn from(choice: StateChoice) -> Self {
        match choice {
            StateChoice::All => PollState::All,
            StateChoice::Open => PollState::Open,
            StateChoice::Closed => PollState::Closed,
        }
    }
}

/// Create and manage polls
#[poise::command(
    slash_command,
    guild_only,
    subcommands(
        "add", "edit", "remove", "close", "open", "show", "jumpto", "notify", "repost"
    ),
    subcommand_required
)]
pub async fn vote(_ctx: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Create a poll in this channel
#[poise::command(slash_command, guild_only)]
async fn add(
    ctx: Context<'_>,
    #[description = "Poll title"] title: String,
    #[description = "Options separated by |"] options: String,
    #[description = "Close date (YYYY/MM/DD HH:MM)"] close_date: Option<String>,
    #[description = "How many options a member may pick (default 1)"] max_selections: Option<i64>,
    #[description = "List who voted for each option (default false)"] show_voters: Option<bool>,
) -> Result<(), AppError> {
    ctx.defer_ephemeral().await?;
    let guild_id = guild_id(&ctx)?;

    let params = CreatePollParams {
        guild_id,
        channel_id: ctx.channel_id().get(),
        title: title.clone(),
        options,
        close_date,
        max_selections: max_selections.unwrap_or(1),
        show_voters: show_voters.unwrap_or(false),
    };
    poll_service(&ctx).create(params).await?;

    reply(ctx, format!("Poll \"{}\" is created!", title.trim()), false).await
}

/// Edit an existing poll
#[poise::command(slash_command, guild_only)]
async fn edit(
    ctx: Context<'_>,
    #[description = "Poll title"] title: String,
    #[description = "New poll title"] new_title: Option<String>,
    #[description = "Options to change or append (format: 0:Option A|2:Option C)"]
    options: Option<String>,
    #[description = "Close date (YYYY/MM/DD HH:MM)"] close_date: Option<String>,
    #[description = "How many options a member may pick"] max_selections: Option<i64>,
    #[description = "List who voted for each option"] show_voters: Option<bool>,
) -> Result<(), AppError> {
    ctx.defer_ephemeral().await?;
    let guild_id = guild_id(&ctx)?;

    let params = EditPollParams {
        guild_id,
        title,
        new_title,
        options,
        close_date,
        max_selections,
        show_voters,
    };
    let title = poll_service(&ctx).edit(params).await?;

    reply(ctx, format!("Poll \"{}\" is updated!", title), false).await
}

/// Delete a poll and every message showing it
#[poise::command(slash_command, guild_only)]
async fn remove(
    ctx: Context<'_>,
    #[description = "Poll title"] title: String,
) -> Result<(), AppError> {
    ctx.defer_ephemeral().await?;
    let guild_id = guild_id(&ctx)?;

    poll_service(&ctx).remove(guild_id, &title).await?;

    reply(ctx, format!("Poll \"{}\" is removed!", title.trim()), false).await
}

/// Stop accepting votes
#[poise::command(slash_command, guild_only)]
async fn close(
    ctx: Context<'_>,
    #[description = "Poll title"] title: String,
) -> Result<(), AppError> {
    ctx.defer_ephemeral().await?;
    let guild_id = guild_id(&ctx)?;

    poll_service(&ctx).close(guild_id, &title).await?;

    reply(ctx, format!("Poll \"{}\" is closed!", title.trim()), false).await
}

/// Accept votes again
#[poise::command(slash_command, guild_only)]
async fn open(
    ctx: Context<'_>,
    #[description = "Poll title"] title: String,
    #[description = "New close date (YYYY/MM/DD HH:MM)"] close_date: Option<String>,
) -> Result<(), AppError> {
    ctx.defer_ephemeral().await?;
    let guild_id = guild_id(&ctx)?;

    poll_service(&ctx)
        .open(guild_id, &title, close_date.as_deref())
        .await?;

    reply(ctx, format!("Poll \"{}\" is opened!", title.trim()), false).await
}

/// Look up polls
#[poise::command(slash_command, guild_only, subcommands("list", "result"), subcommand_required)]
async fn show(_ctx: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// List poll titles
#[poise::command(slash_command, guild_only)]
async fn list(
    ctx: Context<'_>,
    #[description = "Which polls to list (default all)"] state: Option<StateChoice>,
) -> Result<(), AppError> {
    let guild_id = guild_id(&ctx)?;
    let state = state.unwrap_or(StateChoice::All);

    let titles = poll_service(&ctx).list(guild_id, state.into()).await?;

    let content = if titles.is_empty() {
        "There are no polls to show.".to_string()
    } else {
        titles
            .iter()
            .map(|t| format!("- {}", t))
            .collect::<Vec<_>>()
            .join("\n")
    };

    reply(ctx, content, false).await
}

/// Show who voted for what
#[poise::command(slash_command, guild_only)]
async fn result(
    ctx: Context<'_>,
    #[description = "Poll title"] title: String,
) -> Result<(), AppError> {
    let guild_id = guild_id(&ctx)?;

    let view = poll_service(&ctx).result(guild_id, &title).await?;

    ctx.send(
        CreateReply::default()
            .embed(build_embed(&view))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}

/// Link to the poll message
#[poise::command(slash_command, guild_only)]
async fn jumpto(
    ctx: Context<'_>,
    #[description = "Poll title"] title: String,
    #[description = "Show the link to everyone"] public: Option<bool>,
) -> Result<(), AppError> {
    let guild_id = guild_id(&ctx)?;

    let url = poll_service(&ctx).jump_url(guild_id, &title).await?;

    reply(
        ctx,
        format!("[Jump to \"{}\"]({})", title.trim(), url),
        public.unwrap_or(false),
    )
    .await
}

/// Mention members who have not voted yet
#[poise::command(slash_command, guild_only)]
async fn notify(
    ctx: Context<'_>,
    #[description = "Poll title"] title: String,
    #[description = "Post the mentions for everyone to see"] public: Option<bool>,
) -> Result<(), AppError> {
    ctx.defer_ephemeral().await?;
    let guild_id = guild_id(&ctx)?;

    let pending = poll_service(&ctx).pending_voters(guild_id, &title).await?;
    if pending.is_empty() {
        return reply(
            ctx,
            format!("Everyone has voted on \"{}\"!", title.trim()),
            false,
        )
        .await;
    }

    let header = format!("Please vote on \"{}\":", title.trim());
    let mentions = pending.iter().map(|id| format!("<@{}>", id));
    for message in pack_lines(header, mentions) {
        reply(ctx, message, public.unwrap_or(false)).await?;
    }

    Ok(())
}

/// Post another copy of the poll in this channel
#[poise::command(slash_command, guild_only)]
async fn repost(
    ctx: Context<'_>,
    #[description = "Poll title"] title: String,
) -> Result<(), AppError> {
    ctx.defer_ephemeral().await?;
    let guild_id = guild_id(&ctx)?;

    poll_service(&ctx)
        .repost(guild_id, ctx.channel_id().get(), &title)
        .await?;

    reply(ctx, format!("Poll \"{}\" is reposted!", title.trim()), false).await
}

async fn reply(ctx: Context<'_>, content: String, public: bool) -> Result<(), AppError> {
    ctx.send(CreateReply::default().content(content).ephemeral(!public))
        .await?;

    Ok(())
}

/// Packs `header` and space-separated `items` into messages that fit the content limit.
fn pack_lines(header: String, items: impl Iterator<Item = String>) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = header;
    let mut separator = '\n';

    for item in items {
        if current.len() + separator.len_utf8() + item.len() > MESSAGE_LIMIT {
            messages.push(std::mem::take(&mut current));
        } else {
            current.push(separator);
        }
        current.push_str(&item);
        separator = ' ';
    }
    messages.push(current);
    messages
}
