use std::sync::Arc;

use serenity::all::{
    ComponentInteraction, ComponentInteractionDataKind, Context, EditInteractionResponse,
    Interaction,
};

use crate::{
    bot::gateway::SerenityGateway,
    command::error_reply,
    error::AppError,
    model::view::VOTE_SELECT_ID,
    service::poll::PollService,
    state::AppState,
};

/// Routes component interactions; only the poll select menu is handled here.
pub async fn handle_interaction_create(state: &AppState, ctx: Context, interaction: Interaction) {
    let Interaction::Component(component) = interaction else {
        return;
    };
    if component.data.custom_id != VOTE_SELECT_ID {
        return;
    }

    // Acknowledge first, refreshing every copy of the poll can take a while
    if let Err(e) = component.defer_ephemeral(&ctx.http).await {
        tracing::error!("Failed to acknowledge vote interaction: {}", e);
        return;
    }

    let content = match handle_vote_select(state, &ctx, &component).await {
        Ok(content) => content,
        Err(e) => error_reply(&e),
    };

    if let Err(e) = component
        .edit_response(&ctx.http, EditInteractionResponse::new().content(content))
        .await
    {
        tracing::error!("Failed to answer vote interaction: {}", e);
    }
}

async fn handle_vote_select(
    state: &AppState,
    ctx: &Context,
    component: &ComponentInteraction,
) -> Result<String, AppError> {
    let guild_id = component
        .guild_id
        .ok_or_else(|| AppError::Validation("Polls only work inside a server.".to_string()))?;

    let ComponentInteractionDataKind::StringSelect { values } = &component.data.kind else {
        return Err(AppError::InternalError(format!(
            "Unexpected component kind {:?} for {}",
            component.data.kind, VOTE_SELECT_ID
        )));
    };

    let indices = values
        .iter()
        .map(|v| {
            v.parse::<usize>()
                .map_err(|_| AppError::InternalError(format!("Invalid select value {:?}", v)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let service = PollService::new(
        &state.store,
        Arc::new(SerenityGateway::new(ctx.http.clone())),
        state.utc_offset,
    );
    let (title, labels) = service
        .vote(
            guild_id.get(),
            component.message.id.get(),
            component.user.id.get(),
            &indices,
        )
        .await?;

    tracing::debug!("User {} voted on poll {:?}", component.user.id, title);

    Ok(format!("Vote recorded!\nYou voted for: {}", labels.join(", ")))
}
