//! HTTP handlers.

use std::sync::Arc;

use auth::Identity;
use axum::{extract::State, Json};
use error::AppError;
use serde::{Deserialize, Serialize};

use crate::{middleware::Authenticated, response::ApiError, state::AppState};

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Exchange credentials for a bearer token
///
/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("username and password are required".to_string()).into());
    }

    let subject = state
        .credentials
        .authenticate(&req.username, &req.password)
        .await?;
    let token = state.tokens.issue(&subject)?;

    tracing::info!(user = %subject, "login succeeded");
    Ok(Json(LoginResponse {
        token: token.into_string(),
    }))
}

/// Identity of the caller
///
/// GET /api/me
pub async fn me(Authenticated(identity): Authenticated) -> Json<Identity> {
    Json(identity)
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
