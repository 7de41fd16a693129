//! # lumiere-cart: Cart Store for the Lumière Storefront
//!
//! This crate owns the session shopping cart: line items, the active
//! voucher, derived totals, and the durable snapshot that lets a cart
//! survive process restarts.
//!
//! ## Module Organization
//!
//! - [`store`] - The `CartStore` session handle
//! - [`snapshot`] - Durable key-value contract, line-list codec, in-memory store
//! - [`sqlite`] - SQLite-backed snapshot store
//! - [`catalog`] - Voucher code lookup seam
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lumiere_cart::{CartStore, SnapshotDbConfig, SqliteSnapshotStore, StaticVoucherCatalog};
//!
//! // Session start
//! let snapshots = Arc::new(SqliteSnapshotStore::new(SnapshotDbConfig::at_default_path()).await?);
//! let cart = CartStore::restore(snapshots, Arc::new(StaticVoucherCatalog::storefront())).await;
//!
//! // Cart operations
//! cart.add_item(product, variant, 2).await?;
//! let outcome = cart.apply_voucher("LUMIERE10").await;
//! let totals = cart.totals().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod snapshot;
pub mod sqlite;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{StaticVoucherCatalog, VoucherCatalog};
pub use error::{StoreError, StoreResult};
pub use snapshot::{MemorySnapshotStore, SnapshotStore, CART_SNAPSHOT_KEY};
pub use sqlite::{SnapshotDbConfig, SqliteSnapshotStore};
pub use store::CartStore;
