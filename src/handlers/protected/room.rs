use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;

use crate::database::models::{BookRoomParams, Booking, Room};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::handlers::parse_id;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /api/v1/room
pub async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>, ApiError> {
    let rooms = state.store.rooms.select_any(&Filter::new()).await?;
    Ok(Json(rooms))
}

/// POST /api/v1/room/:id/book
///
/// Books the room for the calling user. Overlapping bookings are not
/// checked.
pub async fn book_room(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<BookRoomParams>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let room_id = parse_id(&id)?;
    let Json(params) = payload?;

    params
        .validate(Utc::now())
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let room = state.store.rooms.select_id(room_id).await?;

    let booking = Booking::new(user.id, room.id, params.from_date, params.till_date)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let booking = state.store.bookings.insert(booking).await?;

    tracing::info!("User {} booked room {} ({})", user.id, room.id, booking.id);
    Ok((StatusCode::CREATED, Json(booking)))
}
