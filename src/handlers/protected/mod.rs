// Endpoints behind the session token. The authenticated user arrives as
// an `Extension<AuthUser>` injected by `jwt_auth_middleware`.
pub mod booking;
pub mod hotel;
pub mod room;
pub mod user;

pub use booking::{cancel_booking, get_booking};
pub use hotel::{get_hotel, get_hotel_rooms, list_hotels, HotelQueryParams};
pub use room::{book_room, list_rooms};
pub use user::{get_user, me};
