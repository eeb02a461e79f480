use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::repository::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomSize {
    Small,
    Normal,
    Kingsize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub size: RoomSize,
    pub seaside: bool,
    pub price: f64,
    pub hotel_id: Uuid,
}

impl Document for Room {
    const COLLECTION: &'static str = "rooms";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Room {
    pub fn new(size: RoomSize, seaside: bool, price: f64, hotel_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            size,
            seaside,
            price,
            hotel_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomParams {
    pub size: RoomSize,
    #[serde(default)]
    pub seaside: bool,
    pub price: f64,
}

impl CreateRoomParams {
    pub fn validate(&self) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        if !self.price.is_finite() || self.price <= 0.0 {
            errors.insert("price".to_string(), "price must be a positive amount".to_string());
        }
        errors
    }

    pub fn into_room(self, hotel_id: Uuid) -> Room {
        Room::new(self.size, self.seaside, self.price, hotel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_serializes_lowercase() {
        assert_eq!(serde_json::to_value(RoomSize::Kingsize).unwrap(), "kingsize");
        assert_eq!(serde_json::from_value::<RoomSize>(serde_json::json!("small")).unwrap(), RoomSize::Small);
        assert!(serde_json::from_value::<RoomSize>(serde_json::json!("huge")).is_err());
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let params = CreateRoomParams { size: RoomSize::Normal, seaside: false, price: 0.0 };
        assert!(params.validate().contains_key("price"));

        let params = CreateRoomParams { size: RoomSize::Normal, seaside: false, price: 99.9 };
        assert!(params.validate().is_empty());
    }
}
