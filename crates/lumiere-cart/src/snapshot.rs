//! # Snapshot Store Contract
//!
//! The durable client-side key-value contract the cart persists through,
//! plus the JSON codec for the persisted line list and an in-memory
//! implementation.
//!
//! ## Persistence Contract
//! - Every cart mutation rewrites the full line list under the fixed key
//!   [`CART_SNAPSHOT_KEY`]
//! - Line items serialize as an ordered JSON array of
//!   `{product, variant, quantity}` records
//! - Absent or malformed stored data is treated as an empty cart, never as
//!   a fatal error
//! - The applied voucher is session-scoped and is never written

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::error::StoreResult;
use lumiere_core::CartLine;

/// Fixed key the cart line list is persisted under.
pub const CART_SNAPSHOT_KEY: &str = "lumiere.cart.lines";

// =============================================================================
// Snapshot Store Trait
// =============================================================================

/// Durable client-side key-value store.
///
/// The cart store is the only consumer; the contract is deliberately small
/// so a platform store (SQLite file, browser storage bridge, ...) can back
/// it without touching cart logic.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Reads the bytes stored under a key, `None` when absent.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Writes bytes under a key, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Deletes a key. No-op when absent.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

// =============================================================================
// Line List Codec
// =============================================================================

/// Serializes the line list for persistence.
pub fn encode_lines(lines: &[CartLine]) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(lines)?)
}

/// Deserializes a persisted line list.
///
/// Lenient on purpose: any decode failure returns `None` and the caller
/// falls back to an empty cart.
pub fn decode_lines(bytes: &[u8]) -> Option<Vec<CartLine>> {
    serde_json::from_slice(bytes).ok()
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// In-memory snapshot store.
///
/// Backs ephemeral sessions and tests; state dies with the process.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySnapshotStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let entries = self.entries.lock().expect("snapshot map poisoned");
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing in-memory snapshot");
        let mut entries = self.entries.lock().expect("snapshot map poisoned");
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("snapshot map poisoned");
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
