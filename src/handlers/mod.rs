pub mod admin;
pub mod health;
pub mod webhook;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::status))
        .route("/health", get(health::health))
        .route(webhook::WEBHOOK_PATH, post(webhook::twilio_webhook))
        .route(
            "/api/users",
            get(admin::list_users).post(admin::add_user),
        )
        .route("/api/users/:phone/toggle", post(admin::toggle_user))
        .route("/api/send-now", post(admin::send_now))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
