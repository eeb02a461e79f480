use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::database::models::UserProfile;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /api/v1/user/me
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<UserProfile> {
    Json(user.profile())
}

/// GET /api/v1/user/:id - self or admin only
pub async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let id = parse_id(&id)?;

    if user.id != id && !user.is_admin {
        tracing::warn!("User {} attempted to read user {}", user.id, id);
        return Err(ApiError::unauthorized());
    }

    let found = state.store.users.select_id(id).await?;
    Ok(Json(found.into()))
}
