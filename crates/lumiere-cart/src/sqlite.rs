//! # SQLite Snapshot Store
//!
//! SQLite-backed implementation of the [`SnapshotStore`] contract: a single
//! key-value table, WAL journaling, and embedded migrations.
//!
//! One file on disk per storefront install; the cart is the only writer, so
//! contention is not a concern and last write wins.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use directories::ProjectDirs;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::snapshot::SnapshotStore;

/// Embedded migrations from the `migrations` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

// =============================================================================
// Configuration
// =============================================================================

/// Snapshot database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = SnapshotDbConfig::new("./data/cart.db").max_connections(2);
/// let store = SqliteSnapshotStore::new(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotDbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 2 (one writer session plus a reader is plenty)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl SnapshotDbConfig {
    /// Creates a configuration with the given database path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotDbConfig {
            database_path: path.into(),
            max_connections: 2,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// Creates a configuration pointing at the platform data directory
    /// (`.../Lumiere/lumiere-storefront/cart.db`).
    pub fn at_default_path() -> Self {
        let path = ProjectDirs::from("vn", "Lumiere", "lumiere-storefront")
            .map(|dirs| dirs.data_dir().join("cart.db"))
            .unwrap_or_else(|| PathBuf::from("lumiere-cart.db"));
        SnapshotDbConfig::new(path)
    }

    /// Creates an in-memory database configuration (for testing).
    pub fn in_memory() -> Self {
        SnapshotDbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }
}

// =============================================================================
// SQLite Store
// =============================================================================

/// SQLite-backed snapshot store.
#[derive(Debug, Clone)]
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
}

impl SqliteSnapshotStore {
    /// Opens (creating if missing) the snapshot database.
    ///
    /// Configures WAL journaling and NORMAL synchronous mode, builds the
    /// pool, and applies pending migrations when enabled.
    pub async fn new(config: SnapshotDbConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening cart snapshot store"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        let store = SqliteSnapshotStore { pool };

        if config.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Runs pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let value: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT value FROM snapshots WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing snapshot");

        let updated_at = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO snapshots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM snapshots WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::CART_SNAPSHOT_KEY;

    #[tokio::test]
    async fn test_in_memory_roundtrip() {
        let store = SqliteSnapshotStore::new(SnapshotDbConfig::in_memory())
            .await
            .unwrap();

        assert!(store.get(CART_SNAPSHOT_KEY).await.unwrap().is_none());

        store
            .set(CART_SNAPSHOT_KEY, b"[1,2,3]".to_vec())
            .await
            .unwrap();
        assert_eq!(
            store.get(CART_SNAPSHOT_KEY).await.unwrap(),
            Some(b"[1,2,3]".to_vec())
        );

        // Overwrite replaces the previous value
        store
            .set(CART_SNAPSHOT_KEY, b"[]".to_vec())
            .await
            .unwrap();
        assert_eq!(
            store.get(CART_SNAPSHOT_KEY).await.unwrap(),
            Some(b"[]".to_vec())
        );

        store.remove(CART_SNAPSHOT_KEY).await.unwrap();
        assert!(store.get(CART_SNAPSHOT_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let store = SqliteSnapshotStore::new(SnapshotDbConfig::in_memory())
            .await
            .unwrap();
        store.run_migrations().await.unwrap();
    }

    #[test]
    fn test_config_builder() {
        let config = SnapshotDbConfig::new("/tmp/cart.db").max_connections(4);
        assert_eq!(config.max_connections, 4);
        assert!(config.run_migrations);
    }
}
