//! Authentication HTTP handlers

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::error::ApiResult;
use crate::entities::user::UserSummary;
use crate::server::state::AppState;

/// Payload for `POST /login`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Run one login attempt through the lockout guard.
///
/// Locked accounts answer 403 with the remaining minutes; a wrong
/// password and an unknown email both answer the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let account = state
        .login
        .attempt_login(&payload.email, &payload.password)
        .await?;

    Ok(Json(json!({
        "success": true,
        "user": UserSummary::of(&account),
    })))
}
