use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::repository::Document;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub rating: i32,
    #[serde(default)]
    pub rooms: Vec<Uuid>,
}

impl Document for Hotel {
    const COLLECTION: &'static str = "hotels";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHotelParams {
    pub name: String,
    pub location: String,
    pub rating: i32,
}

impl CreateHotelParams {
    pub fn validate(&self) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        if self.name.trim().is_empty() {
            errors.insert("name".to_string(), "name is required".to_string());
        }
        if self.location.trim().is_empty() {
            errors.insert("location".to_string(), "location is required".to_string());
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            errors.insert(
                "rating".to_string(),
                format!("rating must be between {} and {}", MIN_RATING, MAX_RATING),
            );
        }
        errors
    }
}

impl Hotel {
    pub fn new(name: impl Into<String>, location: impl Into<String>, rating: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            location: location.into(),
            rating,
            rooms: Vec::new(),
        }
    }
}

impl From<CreateHotelParams> for Hotel {
    fn from(params: CreateHotelParams) -> Self {
        Hotel::new(params.name.trim(), params.location.trim(), params.rating)
    }
}
