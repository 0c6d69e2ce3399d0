//! Authentication extractors and middleware
//!
//! Provides Axum extractors for bearer access tokens and API keys, plus
//! middleware variants for protecting whole route groups.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Authenticated user extracted from a bearer access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let user_id = app_state.auth().authenticate(&parts.headers)?;
        Ok(AuthUser { user_id })
    }
}

/// Marker for a request that presented the configured API key
#[derive(Debug, Clone, Copy)]
pub struct ServiceCaller;

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for ServiceCaller
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        app_state.auth().authenticate_api_key(&parts.headers)?;
        Ok(ServiceCaller)
    }
}

/// Middleware form of [`AuthUser`]
///
/// Inserts the `AuthUser` into request extensions on success.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = state.auth().authenticate(request.headers())?;
    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

/// Middleware form of [`ServiceCaller`], for webhook-style route groups
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    state.auth().authenticate_api_key(request.headers())?;

    Ok(next.run(request).await)
}
