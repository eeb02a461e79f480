use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::collection::DocumentCollection;
use crate::database::manager::DatabaseError;
use crate::database::models::{Booking, User};
use crate::database::models::user::normalize_email;
use crate::filter::Filter;

/// An entity stored as one document in a named collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// Typed view over a [`DocumentCollection`].
pub struct Repository<T> {
    collection: Arc<dyn DocumentCollection>,
    _phantom: PhantomData<T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            collection: Arc::clone(&self.collection),
            _phantom: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self {
            collection,
            _phantom: PhantomData,
        }
    }

    pub async fn insert(&self, entity: T) -> Result<T, DatabaseError> {
        let doc = serde_json::to_value(&entity)?;
        self.collection.insert(entity.id(), doc).await?;
        Ok(entity)
    }

    pub async fn select_id(&self, id: Uuid) -> Result<T, DatabaseError> {
        let doc = self.collection.get(id).await?;
        Ok(serde_json::from_value(doc)?)
    }

    pub async fn select_any(&self, filter: &Filter) -> Result<Vec<T>, DatabaseError> {
        self.collection
            .find(filter)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(DatabaseError::from))
            .collect()
    }

    pub async fn select_one(&self, filter: &Filter) -> Result<Option<T>, DatabaseError> {
        let filter = filter.clone().limit(1, None)?;
        Ok(self.select_any(&filter).await?.into_iter().next())
    }

    pub async fn update(&self, id: Uuid, patch: Value) -> Result<(), DatabaseError> {
        self.collection.update(id, patch).await
    }

    pub async fn push(&self, id: Uuid, field: &str, value: impl Serialize) -> Result<(), DatabaseError> {
        let value = serde_json::to_value(value)?;
        self.collection.push(id, field, value).await
    }

    pub async fn clear(&self) -> Result<(), DatabaseError> {
        self.collection.clear().await
    }
}

impl Repository<User> {
    pub async fn select_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.select_one(&Filter::new().eq("email", normalize_email(email))).await
    }
}

impl Repository<Booking> {
    /// Active → Cancelled. Cancelling twice is a no-op in effect.
    pub async fn cancel(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.update(id, json!({ "cancelled": true })).await
    }
}
