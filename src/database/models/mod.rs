pub mod booking;
pub mod hotel;
pub mod room;
pub mod user;

pub use booking::{BookRoomParams, Booking, BookingError};
pub use hotel::{CreateHotelParams, Hotel};
pub use room::{CreateRoomParams, Room, RoomSize};
pub use user::{CreateUserParams, User, UserProfile};
