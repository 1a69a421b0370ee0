use rand::{rngs::StdRng, SeedableRng};
use serenity::all::{Context, Message};

use crate::{service::response::ResponseService, state::AppState};

/// Replies to a guild message with the responses linked to any trigger it contains.
pub async fn handle_message(state: &AppState, ctx: Context, message: Message) {
    // Ignore other bots and our own replies
    if message.author.bot {
        return;
    }

    let Some(guild_id) = message.guild_id else {
        return;
    };

    let mut rng = StdRng::from_rng(&mut rand::rng());
    let reply = match ResponseService::new(&state.store)
        .reply_for(guild_id.get(), &message.content, &mut rng)
        .await
    {
        Ok(Some(reply)) => reply,
        Ok(None) => return,
        Err(e) => {
            tracing::error!("Failed to resolve responses in guild {}: {:?}", guild_id, e);
            return;
        }
    };

    if let Err(e) = message.reply(&ctx.http, reply).await {
        tracing::error!("Failed to reply in channel {}: {}", message.channel_id, e);
    }
}
