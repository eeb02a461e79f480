use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::database::models::Booking;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{AuthUser, GenericResponse};
use crate::state::AppState;

/// GET /api/v1/booking/:id - owner only
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking = owned_booking(&state, &user, &id).await?;
    Ok(Json(booking))
}

/// GET /api/v1/booking/:id/cancel - owner only
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<GenericResponse>, ApiError> {
    let booking = owned_booking(&state, &user, &id).await?;
    state.store.bookings.cancel(booking.id).await?;

    tracing::info!("User {} cancelled booking {}", user.id, booking.id);
    Ok(Json(GenericResponse::msg("updated")))
}

/// Load a booking and require the caller to own it. Missing → 404, foreign → 401.
async fn owned_booking(state: &AppState, user: &AuthUser, id: &str) -> Result<Booking, ApiError> {
    let id: Uuid = parse_id(id)?;
    let booking = state.store.bookings.select_id(id).await?;

    if !booking.is_owned_by(user.id) {
        tracing::warn!("User {} attempted to access booking {}", user.id, booking.id);
        return Err(ApiError::unauthorized());
    }
    Ok(booking)
}
