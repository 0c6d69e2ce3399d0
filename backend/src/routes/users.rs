//! User account routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chirpy_shared::{RegisterRequest, UpdateUserRequest, UserProfile};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", post(register).put(update_user))
}

/// Register a new user
///
/// POST /api/v1/users
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let profile =
        UserService::register(state.users(), state.store_timeout(), &req.email, &req.password)
            .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Replace the caller's email and password
///
/// PUT /api/v1/users
///
/// # Authentication
/// Requires valid Bearer access token in Authorization header.
async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::update_credentials(
        state.users(),
        state.store_timeout(),
        auth_user.user_id,
        &req.email,
        &req.password,
    )
    .await?;
    Ok(Json(profile))
}
