use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;

pub async fn health() -> &'static str {
    "ok"
}

#[derive(Serialize)]
pub struct StatusResponse {
    service: &'static str,
    status: &'static str,
    mode: &'static str,
    total_users: usize,
    active_users: usize,
    server_time_utc: String,
}

// GET /
pub async fn status(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, AppError> {
    let users = {
        let repo = state.users.lock().await;
        repo.load_all()?
    };

    Ok(Json(StatusResponse {
        service: "nudge exercise reminders",
        status: "running",
        mode: if state.config.dry_run() { "dry_run" } else { "live" },
        total_users: users.len(),
        active_users: users.iter().filter(|u| u.active).count(),
        server_time_utc: chrono::Utc::now().to_rfc3339(),
    }))
}
