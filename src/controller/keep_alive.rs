use axum::{http::StatusCode, response::IntoResponse};

/// Liveness probe polled by the hosting platform to keep the process awake.
pub async fn keep_alive() -> impl IntoResponse {
    (StatusCode::OK, "Bot is alive!")
}
