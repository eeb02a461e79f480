use axum::{extract::State, Json};

use crate::database::models::Booking;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::state::AppState;

/// GET /api/v1/admin/booking - every booking, cancelled ones included
pub async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state.store.bookings.select_any(&Filter::new()).await?;
    Ok(Json(bookings))
}
