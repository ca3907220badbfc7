use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the notes store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_NOTES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS notes (
        id SERIAL PRIMARY KEY,
        user_id TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATE_NOTES_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS notes_user_id_idx ON notes (user_id)";

/// Connection pool setup and schema bootstrap for the notes database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool against `url` sized and timed per `config`
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let display_url = Self::redacted_url(url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!(
            "Connected to {} (max_connections={})",
            display_url, config.max_connections
        );
        Ok(pool)
    }

    /// Create the notes table if it does not exist yet
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_NOTES_TABLE).execute(pool).await?;
        sqlx::query(CREATE_NOTES_USER_INDEX).execute(pool).await?;
        info!("Notes schema ready");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// DSN with the password stripped, for logs
    pub(crate) fn redacted_url(url: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            let _ = url.set_password(Some("***"));
        }
        Ok(url.into())
    }
}
