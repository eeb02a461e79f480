use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::database::models::{CreateUserParams, User, UserProfile};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthParams {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

/// POST /api/auth - exchange email and password for a session token
///
/// Unknown email and wrong password both answer
/// `400 {"type": "error", "msg": "invalid credentials"}`.
pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthParams>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(params) = payload?;
    let (user, token) = auth::authenticate(
        &state.store,
        &state.tokens,
        &state.passwords,
        &params.email,
        &params.password,
    )
    .await?;

    Ok(Json(AuthResponse {
        user: user.profile(),
        token,
    }))
}

/// POST /api/register - create a non-admin user account
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserParams>, JsonRejection>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let Json(params) = payload?;

    let errors = params.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation_error("invalid user params", errors));
    }

    if state.store.users.select_by_email(&params.email).await?.is_some() {
        return Err(ApiError::conflict("email already registered"));
    }

    let cost = state.config.security.bcrypt_cost;
    let user = tokio::task::spawn_blocking(move || User::from_params(params, cost))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal_server_error()
        })?
        .map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            ApiError::internal_server_error()
        })?;

    let user = state.store.users.insert(user).await?;
    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(user.profile())))
}
