use std::sync::Arc;

use chrono::Utc;
use serenity::http::Http;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    bot::gateway::SerenityGateway, error::AppError, service::poll::PollService,
    state::AppState,
};

/// Starts the poll closer scheduler
///
/// Fires at the start of every wall-clock minute and closes every open poll whose
/// close date has passed, refreshing all of its posted copies.
///
/// # Arguments
/// - `state`: Application context holding the store and the configured timezone
/// - `discord_http`: Discord HTTP client used to edit poll messages
pub async fn start_scheduler(state: AppState, discord_http: Arc<Http>) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let state = state.clone();
        let http = discord_http.clone();

        Box::pin(async move {
            if let Err(e) = close_expired_polls(&state, http).await {
                tracing::error!("Error closing expired polls: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Poll closer scheduler started");

    Ok(())
}

async fn close_expired_polls(state: &AppState, discord_http: Arc<Http>) -> Result<(), AppError> {
    let gateway = Arc::new(SerenityGateway::new(discord_http));
    let service = PollService::new(&state.store, gateway, state.utc_offset);

    let closed = service.close_expired(Utc::now()).await?;
    if closed > 0 {
        tracing::info!("Closed {} expired poll(s)", closed);
    }

    Ok(())
}
