//! Request authentication.
//!
//! [`authentication_gate`] runs in front of every route. It only annotates:
//! a request carrying a valid bearer token gets an [`Identity`] in its
//! extensions, any other request passes through untouched. Rejecting
//! anonymous callers is left to [`require_identity`], which is layered onto
//! the protected routes only.

use std::sync::Arc;

use auth::Identity;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use error::AuthError;

use crate::{response::ApiError, state::AppState};

/// Return the token of an `Authorization: Bearer <token>` header, if any.
///
/// The scheme name is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Attach the caller's [`Identity`] to the request when its bearer token verifies.
///
/// Never rejects: a missing header, another scheme or a failed verification
/// all leave the request anonymous.
pub async fn authentication_gate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    // Identity is only ever set here.
    request.extensions_mut().remove::<Identity>();

    if let Some(token) = bearer_token(request.headers()) {
        match state.tokens.verify(token) {
            Ok(identity) => {
                tracing::debug!(user = %identity.name, "authenticated request");
                request.extensions_mut().insert(identity);
            }
            Err(e) => {
                tracing::debug!(reason = %e, "bearer token rejected, continuing anonymously");
            }
        }
    }

    next.run(request).await
}

/// Reject requests that reached a protected route without an [`Identity`].
pub async fn require_identity(request: Request, next: Next) -> Response {
    if request.extensions().get::<Identity>().is_none() {
        tracing::debug!(path = %request.uri().path(), "anonymous request to protected route");
        return ApiError::from(AuthError::Unauthorized).into_response();
    }
    next.run(request).await
}

/// Extractor for the identity attached by [`authentication_gate`].
///
/// Rejects with 401 when the request is anonymous.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| AuthError::Unauthorized.into())
    }
}
