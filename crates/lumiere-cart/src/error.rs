//! # Store Error Types
//!
//! Error types for cart persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module)    Adds context and categorization           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutError / UI layer    User-facing messages                      │
//! │                                                                         │
//! │  Exception: restore-time read and decode failures are swallowed       │
//! │  by design and fall back to an empty cart (logged, never surfaced).    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use lumiere_core::CoreError;

/// Cart store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage backend connection failed.
    #[error("Snapshot store connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Snapshot store migration failed: {0}")]
    MigrationFailed(String),

    /// Read or write against the storage backend failed.
    #[error("Snapshot store query failed: {0}")]
    QueryFailed(String),

    /// Serializing the line list for persistence failed.
    #[error("Snapshot serialization failed: {0}")]
    Snapshot(String),

    /// A business rule rejected the mutation (wraps CoreError).
    ///
    /// The cart and its snapshot are untouched when this is returned.
    #[error(transparent)]
    Domain(#[from] CoreError),
}

/// Convert sqlx errors to StoreError.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                StoreError::ConnectionFailed("pool timed out".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("pool is closed".to_string()),
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Snapshot(err.to_string())
    }
}

/// Result type for cart store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
