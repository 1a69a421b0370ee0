use std::sync::Arc;

use serenity::all::{Client, GatewayIntents};
use serenity::http::Http;

use crate::{
    bot::handler::Handler,
    command::{self, on_error},
    config::Config,
    error::AppError,
    state::AppState,
};

/// Builds the Discord client with the command framework and event handler attached.
///
/// Nothing connects yet; the returned HTTP client can already be shared with the
/// scheduler before `start_bot` is awaited.
///
/// # Arguments
/// - `config` - Application configuration
/// - `state` - Application context handed to commands and event handlers
///
/// # Returns
/// - `Ok((Client, Arc<Http>))` - The client and its shared HTTP handle
/// - `Err(AppError)` - Client construction failed
pub async fn init_bot(config: &Config, state: AppState) -> Result<(Client, Arc<Http>), AppError> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS;

    let command_state = state.clone();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: command::commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Registered {} slash commands", framework.options().commands.len());
                Ok(command_state)
            })
        })
        .build();

    let client = Client::builder(&config.discord_bot_token, intents)
        .framework(framework)
        .event_handler(Handler::new(state))
        .await?;

    let http = client.http.clone();

    Ok((client, http))
}

/// Connects and runs the bot until shutdown.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
