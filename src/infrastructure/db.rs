//! Connection pool adapter for PostgreSQL
//!
//! Builds the bounded `sqlx` pool from configuration and exposes the health
//! probe used by the `/health` endpoint. Scoped connection acquisition with
//! guaranteed release, and per-statement commit/rollback, are provided by
//! the pool and driver; every driver error is wrapped into a `DomainError`
//! before it crosses the repository boundary, so callers never see
//! driver-specific error types.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

/// Owned handle to the connection pool, produced once at startup and
/// threaded through the call chain (no lazily-initialized global).
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a bounded pool per the configuration. The statement timeout
    /// mirrors the connect timeout.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DomainError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(&config.password)
            .options([(
                "statement_timeout",
                (config.connect_timeout_secs * 1000).to_string(),
            )]);

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(std::time::Duration::from_secs(config.idle_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to connect to PostgreSQL: {e}"))
            })?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "Connected database pool"
        );

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Health probe for the `/health` endpoint, a trait so tests can substitute
/// a stub without a running database.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), DomainError>;
}

#[async_trait]
impl HealthProbe for Database {
    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }
}

/// Wrap a driver error for a failed storage operation.
///
/// Pool exhaustion and I/O failures are connection-level (`Database`);
/// a unique-constraint violation is a business-rule violation surfaced by
/// the storage-level uniqueness guarantee; everything else is a statement
/// failure (`Repository`).
pub(crate) fn storage_error(context: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return DomainError::business(format!(
                "{context}: value violates a unique constraint"
            ));
        }
    }

    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            DomainError::database(format!("{context}: {e}"))
        }
        _ => DomainError::repository(format!("{context}: {e}")),
    }
}
