use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::database::models::{CreateHotelParams, CreateRoomParams, Hotel, Room};
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::state::AppState;

/// POST /api/v1/admin/hotel
pub async fn create_hotel(
    State(state): State<AppState>,
    payload: Result<Json<CreateHotelParams>, JsonRejection>,
) -> Result<(StatusCode, Json<Hotel>), ApiError> {
    let Json(params) = payload?;

    let errors = params.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation_error("invalid hotel params", errors));
    }

    let hotel = state.store.hotels.insert(Hotel::from(params)).await?;
    tracing::info!("Created hotel {} ({})", hotel.name, hotel.id);

    Ok((StatusCode::CREATED, Json(hotel)))
}

/// POST /api/v1/admin/hotel/:id/room
///
/// Inserts the room and appends its id to the hotel's `rooms`.
pub async fn create_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateRoomParams>, JsonRejection>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    let hotel_id = parse_id(&id)?;
    let Json(params) = payload?;

    let errors = params.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation_error("invalid room params", errors));
    }

    let room = state.store.insert_room(params.into_room(hotel_id)).await?;
    tracing::info!("Created room {} in hotel {}", room.id, hotel_id);

    Ok((StatusCode::CREATED, Json(room)))
}
