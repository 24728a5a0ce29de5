use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::User;
use crate::services::admin_auth;
use crate::services::reminders::{self, SweepReport};
use crate::services::users::{self, NewUser};
use crate::state::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

fn check_auth(headers: &HeaderMap, state: &AppState) -> Result<(), AppError> {
    let token = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    admin_auth::verify_token(&state.config.admin_secret, token, chrono::Utc::now()).map_err(|e| {
        tracing::warn!(reason = %e, "rejected admin request");
        AppError::Unauthorized(e.to_string())
    })
}

#[derive(Serialize)]
pub struct UsersResponse {
    users: Vec<User>,
}

// GET /api/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UsersResponse>, AppError> {
    check_auth(&headers, &state)?;

    let users = {
        let repo = state.users.lock().await;
        users::list_users(&**repo)?
    };
    Ok(Json(UsersResponse { users }))
}

// POST /api/users
pub async fn add_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<NewUser>,
) -> Result<Json<User>, AppError> {
    check_auth(&headers, &state)?;

    let user = {
        let repo = state.users.lock().await;
        users::add_user(&**repo, &payload)?
    };
    Ok(Json(user))
}

#[derive(Serialize)]
pub struct ToggleResponse {
    phone: String,
    active: bool,
}

// POST /api/users/:phone/toggle
pub async fn toggle_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(phone): Path<String>,
) -> Result<Json<ToggleResponse>, AppError> {
    check_auth(&headers, &state)?;

    let active = {
        let repo = state.users.lock().await;
        users::toggle_active(&**repo, &phone)?
    };
    Ok(Json(ToggleResponse { phone, active }))
}

// POST /api/send-now
pub async fn send_now(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SweepReport>, AppError> {
    check_auth(&headers, &state)?;

    tracing::info!("manual reminder sweep requested");
    let report = reminders::sweep_now(&state).await?;
    Ok(Json(report))
}
