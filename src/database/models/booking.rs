use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::database::repository::Document;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("from date must be before till date")]
    EmptyRange,

    #[error("cannot book a room in the past")]
    InPast,
}

/// A reservation of a room over the half-open range `[from_date, till_date)`.
/// The only mutation after creation is cancellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub from_date: DateTime<Utc>,
    pub till_date: DateTime<Utc>,
    #[serde(default)]
    pub cancelled: bool,
}

impl Document for Booking {
    const COLLECTION: &'static str = "bookings";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Booking {
    pub fn new(
        user_id: Uuid,
        room_id: Uuid,
        from_date: DateTime<Utc>,
        till_date: DateTime<Utc>,
    ) -> Result<Self, BookingError> {
        if from_date >= till_date {
            return Err(BookingError::EmptyRange);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            room_id,
            from_date,
            till_date,
            cancelled: false,
        })
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRoomParams {
    pub from_date: DateTime<Utc>,
    pub till_date: DateTime<Utc>,
}

impl BookRoomParams {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), BookingError> {
        if self.from_date < now {
            return Err(BookingError::InPast);
        }
        if self.from_date >= self.till_date {
            return Err(BookingError::EmptyRange);
        }
        Ok(())
    }
}
