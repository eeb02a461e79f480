use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::collection::{validate_patch, DocumentCollection};
use crate::database::manager::DatabaseError;
use crate::filter::{validate_identifier, Filter};

/// In-process collection with the same filter and update semantics as the
/// postgres backend. Documents are kept in insertion order.
pub struct MemoryCollection {
    name: String,
    docs: RwLock<Vec<(Uuid, Value)>>,
    unique_fields: Vec<&'static str>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: RwLock::new(Vec::new()),
            unique_fields: Vec::new(),
        }
    }

    /// Reject inserts whose value for `field` is already present, mirroring a unique index.
    pub fn with_unique(mut self, field: &'static str) -> Self {
        self.unique_fields.push(field);
        self
    }

    fn not_found(&self, id: Uuid) -> DatabaseError {
        DatabaseError::NotFound(format!("{} {}", self.name, id))
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn insert(&self, id: Uuid, doc: Value) -> Result<(), DatabaseError> {
        let mut docs = self.docs.write().await;
        if docs.iter().any(|(existing, _)| *existing == id) {
            return Err(DatabaseError::Duplicate(format!("{} {}", self.name, id)));
        }
        for field in &self.unique_fields {
            if let Some(value) = doc.get(*field) {
                if docs.iter().any(|(_, d)| d.get(*field) == Some(value)) {
                    return Err(DatabaseError::Duplicate(format!("{}.{}", self.name, field)));
                }
            }
        }
        docs.push((id, doc));
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Value, DatabaseError> {
        let docs = self.docs.read().await;
        docs.iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, doc)| doc.clone())
            .ok_or_else(|| self.not_found(id))
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Value>, DatabaseError> {
        filter.validate()?;
        let offset = filter.get_offset().unwrap_or(0).max(0) as usize;
        let limit = filter.get_limit().map(|l| l.max(0) as usize).unwrap_or(usize::MAX);

        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .map(|(_, doc)| doc)
            .filter(|doc| filter.matches(doc))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, patch: Value) -> Result<(), DatabaseError> {
        validate_patch(&patch)?;
        let mut docs = self.docs.write().await;
        let (_, doc) = docs
            .iter_mut()
            .find(|(existing, _)| *existing == id)
            .ok_or_else(|| self.not_found(id))?;

        if let (Some(target), Value::Object(fields)) = (doc.as_object_mut(), patch) {
            for (key, value) in fields {
                target.insert(key, value);
            }
        }
        Ok(())
    }

    async fn push(&self, id: Uuid, field: &str, value: Value) -> Result<(), DatabaseError> {
        validate_identifier(field)?;
        let mut docs = self.docs.write().await;
        let (_, doc) = docs
            .iter_mut()
            .find(|(existing, _)| *existing == id)
            .ok_or_else(|| self.not_found(id))?;

        let target = doc
            .as_object_mut()
            .ok_or_else(|| DatabaseError::QueryError(format!("{} {} is not an object", self.name, id)))?;
        match target.get_mut(field) {
            Some(Value::Array(items)) => items.push(value),
            _ => {
                target.insert(field.to_string(), Value::Array(vec![value]));
            }
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), DatabaseError> {
        self.docs.write().await.clear();
        Ok(())
    }
}
