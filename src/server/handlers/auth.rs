use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{issue_token, require_bearer};
use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issues a one-hour bearer token for the configured admin credentials.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let settings = &state.settings;
    if request.username != settings.admin_username || request.password != settings.admin_password {
        return Err(ApiError::InvalidCredentials);
    }

    let token = issue_token(&request.username, &settings.secret_key)?;
    tracing::info!("Issued token for user {}", request.username);
    Ok(Json(json!({ "token": token })))
}

pub async fn health(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&headers, &state.settings.secret_key)?;
    Ok(Json(json!({
        "status": "success",
        "message": "health check done."
    })))
}
