use serenity::all::{Context, Guild, UnavailableGuild};

use crate::{
    bot::gateway::SerenityGateway,
    service::{poll::PollService, response::ResponseService},
    state::AppState,
};

/// Handles a guild becoming available, including a fresh join.
///
/// Makes sure the guild has a trigger-response table so later lookups never miss.
pub async fn handle_guild_create(
    state: &AppState,
    _ctx: Context,
    guild: Guild,
    _is_new: Option<bool>,
) {
    let guild_id = guild.id.get();
    let response_service = ResponseService::new(&state.store);

    match response_service.ensure_guild(guild_id).await {
        Ok(true) => tracing::info!("Created response table for guild {} ({})", guild.name, guild_id),
        Ok(false) => tracing::debug!("Guild {} ({}) available", guild.name, guild_id),
        Err(e) => tracing::error!("Failed to prepare response table for guild {}: {:?}", guild_id, e),
    }
}

/// Handles the bot leaving a guild by dropping everything stored for it.
///
/// An outage (`unavailable`) also fires this event; nothing is deleted in that case.
pub async fn handle_guild_delete(
    state: &AppState,
    ctx: Context,
    incomplete: UnavailableGuild,
    _full: Option<Guild>,
) {
    if incomplete.unavailable {
        tracing::warn!("Guild {} became unavailable", incomplete.id);
        return;
    }

    let guild_id = incomplete.id.get();

    if let Err(e) = ResponseService::new(&state.store)
        .remove_guild(guild_id)
        .await
    {
        tracing::error!("Failed to delete response table of guild {}: {:?}", guild_id, e);
    }

    let poll_service = PollService::new(
        &state.store,
        std::sync::Arc::new(SerenityGateway::new(ctx.http.clone())),
        state.utc_offset,
    );

    match poll_service.remove_guild(guild_id).await {
        Ok(count) => tracing::info!("Left guild {}, removed {} poll(s)", guild_id, count),
        Err(e) => tracing::error!("Failed to delete polls of guild {}: {:?}", guild_id, e),
    }
}
