use axum::{extract::State, Json};

use crate::database::models::UserProfile;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::state::AppState;

/// GET /api/v1/admin/user
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserProfile>>, ApiError> {
    let users = state.store.users.select_any(&Filter::new()).await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}
