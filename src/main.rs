mod bot;
mod command;
mod config;
mod controller;
mod data;
mod error;
mod model;
mod router;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use crate::{
    config::Config, error::AppError, scheduler::poll_closer, state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    startup::init_tracing();

    let store = startup::connect_to_store(&config).await?;
    let state = AppState::new(store, config.utc_offset);

    tracing::info!("Starting nebot");

    // Keep-alive endpoint runs for the whole process lifetime
    let keep_alive_addr = config.keep_alive_addr.clone();
    tokio::spawn(async move {
        if let Err(e) = startup::serve_keep_alive(&keep_alive_addr).await {
            tracing::error!("Keep-alive server error: {}", e);
        }
    });

    // Initialize Discord bot and extract HTTP client
    let (bot_client, discord_http) = bot::start::init_bot(&config, state.clone()).await?;

    // Start poll closer scheduler
    tokio::spawn(async move {
        if let Err(e) = poll_closer::start_scheduler(state, discord_http).await {
            tracing::error!("Poll closer scheduler error: {}", e);
        }
    });

    bot::start::start_bot(bot_client).await
}
