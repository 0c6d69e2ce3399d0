//! Authentication routes
//!
//! Login, refresh, revoke and the authenticated caller's profile. Refresh
//! and revoke take the refresh token as `Authorization: Bearer <token>`.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chirpy_shared::{AccessToken, AuthTokens, LoginRequest, UserProfile};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/revoke", post(revoke))
        .route("/me", get(get_profile))
}

/// Login with email and password
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = state.auth().login(&req.email, &req.password).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new access token
///
/// POST /api/v1/auth/refresh
async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<AccessToken>> {
    let token = state.auth().refresh(&headers).await?;
    Ok(Json(token))
}

/// Revoke a refresh token
///
/// POST /api/v1/auth/revoke
async fn revoke(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    state.auth().revoke(&headers).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get current user profile (requires authentication)
///
/// GET /api/v1/auth/me
async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let profile =
        UserService::get_profile(state.users(), state.store_timeout(), auth_user.user_id).await?;
    Ok(Json(profile))
}
