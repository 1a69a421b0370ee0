use axum::{routing::get, Router};

use crate::controller::keep_alive::keep_alive;

pub fn router() -> Router {
    Router::new().route("/", get(keep_alive))
}
