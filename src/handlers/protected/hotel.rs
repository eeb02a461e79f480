use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::database::models::{Hotel, Room};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::handlers::parse_id;
use crate::middleware::ResourceResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HotelQueryParams {
    pub rating: Option<i32>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/v1/hotel?rating=&page=&limit=
///
/// Pages are 1-based. `limit` defaults to `API_DEFAULT_PAGE_LIMIT` and is
/// capped at `API_MAX_PAGE_LIMIT`.
pub async fn list_hotels(
    State(state): State<AppState>,
    query: Result<Query<HotelQueryParams>, QueryRejection>,
) -> Result<Json<ResourceResponse<Hotel>>, ApiError> {
    let Query(params) = query?;
    let api = &state.config.api;

    let page = params.page.unwrap_or(1);
    if page < 1 {
        return Err(ApiError::bad_request("page must be at least 1"));
    }
    let limit = params.limit.unwrap_or(api.default_page_limit);
    if limit < 1 {
        return Err(ApiError::bad_request("limit must be at least 1"));
    }
    let limit = limit.min(api.max_page_limit);

    let mut filter = Filter::new();
    if let Some(rating) = params.rating {
        filter = filter.eq("rating", rating);
    }
    let offset = (page - 1)
        .checked_mul(limit)
        .ok_or_else(|| ApiError::bad_request("page out of range"))?;
    let filter = filter
        .limit(limit, Some(offset))
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let hotels = state.store.hotels.select_any(&filter).await?;
    Ok(Json(ResourceResponse::new(hotels, page)))
}

/// GET /api/v1/hotel/:id
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Hotel>, ApiError> {
    let id = parse_id(&id)?;
    let hotel = state.store.hotels.select_id(id).await?;
    Ok(Json(hotel))
}

/// GET /api/v1/hotel/:id/rooms
pub async fn get_hotel_rooms(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let id = parse_id(&id)?;

    // 404 for an unknown hotel rather than an empty list
    state.store.hotels.select_id(id).await?;

    let filter = Filter::new().eq("hotel_id", id.to_string());
    let rooms = state.store.rooms.select_any(&filter).await?;
    Ok(Json(rooms))
}
