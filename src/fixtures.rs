//! Canned records for seeding a store and for integration tests.
//!
//! Users created here follow a fixed convention: `first@last.com` with the
//! password `first_last`.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Booking, BookingError, CreateUserParams, Hotel, Room, RoomSize, User};
use crate::database::{DatabaseError, Store};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Invalid booking: {0}")]
    Booking(#[from] BookingError),
}

pub fn fixture_email(first: &str, last: &str) -> String {
    format!("{}@{}.com", first, last)
}

pub fn fixture_password(first: &str, last: &str) -> String {
    format!("{}_{}", first, last)
}

pub async fn add_user(
    store: &Store,
    first: &str,
    last: &str,
    is_admin: bool,
    bcrypt_cost: u32,
) -> Result<User, FixtureError> {
    let params = CreateUserParams {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: fixture_email(first, last),
        password: fixture_password(first, last),
    };
    let mut user = User::from_params(params, bcrypt_cost)?;
    user.is_admin = is_admin;
    Ok(store.users.insert(user).await?)
}

pub async fn add_hotel(store: &Store, name: &str, location: &str, rating: i32) -> Result<Hotel, FixtureError> {
    Ok(store.hotels.insert(Hotel::new(name, location, rating)).await?)
}

/// Insert a room and attach it to `hotel_id`.
pub async fn add_room(
    store: &Store,
    size: RoomSize,
    seaside: bool,
    price: f64,
    hotel_id: Uuid,
) -> Result<Room, FixtureError> {
    Ok(store.insert_room(Room::new(size, seaside, price, hotel_id)).await?)
}

pub async fn add_booking(
    store: &Store,
    user_id: Uuid,
    room_id: Uuid,
    from_date: DateTime<Utc>,
    till_date: DateTime<Utc>,
) -> Result<Booking, FixtureError> {
    let booking = Booking::new(user_id, room_id, from_date, till_date)?;
    Ok(store.bookings.insert(booking).await?)
}

const HOTEL_NAMES: [&str; 8] = [
    "Bellucia", "The Cozy Hotel", "Dont die in your sleep", "Seaside Inn",
    "Grand Meridian", "Harbor View", "Old Mill Lodge", "Sunset Palms",
];

const LOCATIONS: [&str; 6] = ["France", "The Netherlands", "Belgium", "Portugal", "Spain", "Italy"];

/// Insert `count` hotels with random names, locations and ratings, each
/// carrying one room of every size.
pub async fn add_random_hotels(store: &Store, count: usize) -> Result<Vec<Hotel>, FixtureError> {
    let mut hotels = Vec::with_capacity(count);

    for i in 0..count {
        let (name, location, rating, seaside) = {
            let mut rng = rand::thread_rng();
            let name = format!("{} {}", HOTEL_NAMES.choose(&mut rng).unwrap_or(&"Hotel"), i + 1);
            let location = LOCATIONS.choose(&mut rng).unwrap_or(&"Nowhere").to_string();
            (name, location, rng.gen_range(1..=5), rng.gen_bool(0.5))
        };

        let hotel = add_hotel(store, &name, &location, rating).await?;
        for (size, price) in [(RoomSize::Small, 99.9), (RoomSize::Normal, 149.9), (RoomSize::Kingsize, 249.9)] {
            add_room(store, size, seaside, price, hotel.id).await?;
        }
        hotels.push(store.hotels.select_id(hotel.id).await?);
    }

    Ok(hotels)
}
