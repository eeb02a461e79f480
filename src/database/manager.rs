use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::filter::{validate_identifier, FilterError};

/// Errors from the document store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid database name: {0}")]
    InvalidDatabaseName(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return DatabaseError::Duplicate(db_err.message().to_string());
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Connection bootstrap and schema management for the postgres backend.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool against `config.name` on the server named by `config.url`.
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let base = config.url.as_deref().ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let connection_string = Self::build_connection_string(base, &config.name)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;

        info!("Created database pool for: {}", config.name);
        Ok(pool)
    }

    /// Create the collection tables and indexes if they do not exist yet.
    pub async fn ensure_collections(pool: &PgPool, collections: &[&str]) -> Result<(), DatabaseError> {
        for collection in collections {
            validate_identifier(collection)?;
            let create_table = format!(
                "CREATE TABLE IF NOT EXISTS \"{0}\" (
                    \"seq\" BIGSERIAL,
                    \"id\" UUID PRIMARY KEY,
                    \"doc\" JSONB NOT NULL
                )",
                collection
            );
            let create_index = format!(
                "CREATE INDEX IF NOT EXISTS \"{0}_doc_idx\" ON \"{0}\" USING GIN (\"doc\" jsonb_path_ops)",
                collection
            );
            sqlx::query(&create_table).execute(pool).await?;
            sqlx::query(&create_index).execute(pool).await?;
        }

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS \"users_email_key\" ON \"users\" ((\"doc\" ->> 'email'))",
        )
        .execute(pool)
        .await?;

        info!("Ensured collections: {}", collections.join(", "));
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    fn build_connection_string(base: &str, database_name: &str) -> Result<String, DatabaseError> {
        if !Self::is_valid_db_name(database_name) {
            return Err(DatabaseError::InvalidDatabaseName(database_name.to_string()));
        }
        let mut url = url::Url::parse(base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        url.set_path(&format!("/{}", database_name));
        Ok(url.into())
    }

    fn is_valid_db_name(name: &str) -> bool {
        validate_identifier(name).is_ok()
    }
}
