use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::{validate_identifier, Filter};

/// Untyped document collection. Every document is a JSON object keyed by a UUID.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    async fn insert(&self, id: Uuid, doc: Value) -> Result<(), DatabaseError>;

    /// Fails with [`DatabaseError::NotFound`] when no document has this id.
    async fn get(&self, id: Uuid) -> Result<Value, DatabaseError>;

    async fn find(&self, filter: &Filter) -> Result<Vec<Value>, DatabaseError>;

    /// Merge the top-level fields of `patch` into the document.
    async fn update(&self, id: Uuid, patch: Value) -> Result<(), DatabaseError>;

    /// Append `value` to the array stored under `field`, creating it if absent.
    async fn push(&self, id: Uuid, field: &str, value: Value) -> Result<(), DatabaseError>;

    async fn clear(&self) -> Result<(), DatabaseError>;
}

/// Patches may not touch the document id.
pub(crate) fn validate_patch(patch: &Value) -> Result<(), DatabaseError> {
    let obj = patch
        .as_object()
        .ok_or_else(|| DatabaseError::QueryError("update patch must be an object".to_string()))?;
    for key in obj.keys() {
        validate_identifier(key)?;
        if key == "id" {
            return Err(DatabaseError::QueryError("document id cannot be updated".to_string()));
        }
    }
    Ok(())
}

/// Postgres-backed collection: one table of `(seq, id, doc JSONB)` rows.
pub struct PgCollection {
    name: String,
    pool: PgPool,
}

impl PgCollection {
    pub fn new(name: impl Into<String>, pool: PgPool) -> Result<Self, DatabaseError> {
        let name = name.into();
        validate_identifier(&name)?;
        Ok(Self { name, pool })
    }
}

#[async_trait]
impl DocumentCollection for PgCollection {
    async fn insert(&self, id: Uuid, doc: Value) -> Result<(), DatabaseError> {
        let query = format!("INSERT INTO \"{}\" (\"id\", \"doc\") VALUES ($1, $2)", self.name);
        sqlx::query(&query).bind(id).bind(doc).execute(&self.pool).await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Value, DatabaseError> {
        let query = format!("SELECT \"doc\" FROM \"{}\" WHERE \"id\" = $1", self.name);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} {}", self.name, id)))?;
        Ok(row.try_get("doc")?)
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Value>, DatabaseError> {
        let sql_result = filter.to_sql(&self.name)?;
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params {
            q = q.bind(p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<Value, _>("doc").map_err(DatabaseError::from))
            .collect()
    }

    async fn update(&self, id: Uuid, patch: Value) -> Result<(), DatabaseError> {
        validate_patch(&patch)?;
        let query = format!("UPDATE \"{}\" SET \"doc\" = \"doc\" || $2 WHERE \"id\" = $1", self.name);
        let result = sqlx::query(&query).bind(id).bind(patch).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("{} {}", self.name, id)));
        }
        Ok(())
    }

    async fn push(&self, id: Uuid, field: &str, value: Value) -> Result<(), DatabaseError> {
        validate_identifier(field)?;
        let query = format!(
            "UPDATE \"{}\" SET \"doc\" = jsonb_set(\"doc\", ARRAY[$2::text], COALESCE(\"doc\" -> $2::text, '[]'::jsonb) || jsonb_build_array($3::jsonb)) WHERE \"id\" = $1",
            self.name
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(field)
            .bind(value)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("{} {}", self.name, id)));
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), DatabaseError> {
        let query = format!("TRUNCATE TABLE \"{}\"", self.name);
        sqlx::query(&query).execute(&self.pool).await?;
        Ok(())
    }
}
