// Endpoints for users with the admin flag. Routes are layered with
// `jwt_auth_middleware` then `admin_auth_middleware`.
pub mod booking;
pub mod hotel;
pub mod user;

pub use booking::list_bookings;
pub use hotel::{create_hotel, create_room};
pub use user::list_users;
