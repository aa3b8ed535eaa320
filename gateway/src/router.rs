//! Route table
//!
//! `/auth/*` and `/health` are public. Everything under `/api` requires an
//! identity attached by the authentication gate.

use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};

use crate::{
    handlers,
    middleware::{authentication_gate, require_identity},
    state::AppState,
};

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/health", get(handlers::health));

    let protected = Router::new()
        .route("/api/me", get(handlers::me))
        .route_layer(from_fn(require_identity));

    public
        .merge(protected)
        .layer(from_fn_with_state(state.clone(), authentication_gate))
        .with_state(state)
}
