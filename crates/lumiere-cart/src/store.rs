//! # Cart Store
//!
//! The session cart handle: single source of truth for cart contents and
//! voucher state, persisted through a [`SnapshotStore`].
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Lifecycle                                 │
//! │                                                                         │
//! │  Session start ──► CartStore::restore(snapshots, vouchers)             │
//! │                        │                                                │
//! │                        ├── snapshot present & valid ──► restored cart  │
//! │                        └── absent / malformed ─────────► empty cart    │
//! │                                                                         │
//! │  Mutations (add_item, set_quantity, remove_item, clear)                │
//! │      stage on a copy ──► persist snapshot ──► commit to memory         │
//! │                                                                         │
//! │  Logout / session end ──► drop the handle                              │
//! │                                                                         │
//! │  NOTE: The voucher is session-scoped; it is applied in memory only     │
//! │        and intentionally does not survive a restart.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The handle is constructed at session start and passed explicitly to
//! whatever surface needs it; there is no ambient global cart.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::catalog::VoucherCatalog;
use crate::error::StoreResult;
use crate::snapshot::{self, SnapshotStore, CART_SNAPSHOT_KEY};
use lumiere_core::{
    Cart, CartLine, CartTotals, CoreResult, Money, Product, ProductVariant, Voucher,
    VoucherOutcome,
};

// =============================================================================
// Cart Store
// =============================================================================

/// Session cart backed by a durable snapshot store.
///
/// ## Thread Safety
/// One logical mutator per session, but the handle is shared across UI
/// surfaces, so the cart sits behind an async `Mutex`. The lock is held
/// across the persist await: mutations are strictly ordered and a reader
/// never observes a state that was not durably written.
pub struct CartStore {
    cart: Mutex<Cart>,
    snapshots: Arc<dyn SnapshotStore>,
    vouchers: Arc<dyn VoucherCatalog>,
}

impl CartStore {
    /// Restores the session cart from the snapshot store.
    ///
    /// ## Behavior
    /// - Stored snapshot decodes: cart starts from the persisted lines
    /// - Key absent: cart starts empty
    /// - Read error or malformed bytes: cart starts empty; logged at WARN,
    ///   never surfaced to the customer
    pub async fn restore(
        snapshots: Arc<dyn SnapshotStore>,
        vouchers: Arc<dyn VoucherCatalog>,
    ) -> Self {
        let cart = match snapshots.get(CART_SNAPSHOT_KEY).await {
            Ok(Some(bytes)) => match snapshot::decode_lines(&bytes) {
                Some(lines) => {
                    debug!(lines = lines.len(), "Restored cart snapshot");
                    Cart::from_lines(lines)
                }
                None => {
                    warn!("Cart snapshot is malformed; starting with an empty cart");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Cart snapshot read failed; starting with an empty cart");
                Cart::new()
            }
        };

        CartStore {
            cart: Mutex::new(cart),
            snapshots,
            vouchers,
        }
    }

    /// Creates an empty store without touching the snapshot store.
    ///
    /// Used when a fresh session must not inherit a previous cart (e.g.
    /// right after an account switch); the first mutation overwrites the
    /// old snapshot.
    pub fn empty(snapshots: Arc<dyn SnapshotStore>, vouchers: Arc<dyn VoucherCatalog>) -> Self {
        CartStore {
            cart: Mutex::new(Cart::new()),
            snapshots,
            vouchers,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Applies a mutation all-or-nothing: stage on a copy, persist, commit.
    ///
    /// A rejected rule or a failed write leaves both the in-memory cart and
    /// the stored snapshot exactly as they were.
    async fn mutate<F>(&self, f: F) -> StoreResult<CartTotals>
    where
        F: FnOnce(&mut Cart) -> CoreResult<()>,
    {
        let mut cart = self.cart.lock().await;

        let mut staged = cart.clone();
        f(&mut staged)?;

        let bytes = snapshot::encode_lines(staged.lines())?;
        self.snapshots.set(CART_SNAPSHOT_KEY, bytes).await?;

        *cart = staged;
        Ok(CartTotals::from(&*cart))
    }

    /// Adds a variant to the cart, merging with an existing line.
    ///
    /// ## Behavior
    /// - Quantity must be positive, otherwise a validation error
    /// - A line already holding `variant.id` has its quantity increased
    /// - The snapshot is rewritten before the mutation commits
    pub async fn add_item(
        &self,
        product: Product,
        variant: ProductVariant,
        quantity: i64,
    ) -> StoreResult<CartTotals> {
        debug!(variant_id = %variant.id, quantity = %quantity, "add_item");
        self.mutate(|cart| cart.add_item(product, variant, quantity))
            .await
    }

    /// Removes the line for a variant id. No-op (not an error) when absent.
    pub async fn remove_item(&self, variant_id: &str) -> StoreResult<CartTotals> {
        debug!(variant_id = %variant_id, "remove_item");
        self.mutate(|cart| {
            cart.remove_item(variant_id);
            Ok(())
        })
        .await
    }

    /// Overwrites the quantity for a variant id.
    ///
    /// `quantity ≤ 0` behaves as `remove_item`; an absent id is a no-op.
    pub async fn set_quantity(&self, variant_id: &str, quantity: i64) -> StoreResult<CartTotals> {
        debug!(variant_id = %variant_id, quantity = %quantity, "set_quantity");
        self.mutate(|cart| {
            cart.set_quantity(variant_id, quantity);
            Ok(())
        })
        .await
    }

    /// Empties the cart and clears the voucher.
    ///
    /// Called by the checkout flow after a successful order submission.
    pub async fn clear(&self) -> StoreResult<CartTotals> {
        debug!("clear cart");
        self.mutate(|cart| {
            cart.clear();
            Ok(())
        })
        .await
    }

    /// Applies a voucher code against the catalog.
    ///
    /// ## Behavior
    /// - Match: replaces the active voucher, reports `Applied`
    /// - No match: clears any active voucher, reports `Rejected`
    ///
    /// Both outcomes are ordinary results carrying a display message; this
    /// call never fails. The voucher is not persisted: it intentionally
    /// does not survive a session boundary, so a stale discount code can't
    /// resurface on reload.
    pub async fn apply_voucher(&self, code: &str) -> VoucherOutcome {
        let resolved = self.vouchers.resolve(code).await;

        let mut cart = self.cart.lock().await;
        match resolved {
            Some(voucher) => {
                debug!(code = %voucher.code, percent = voucher.discount_percent, "Voucher applied");
                cart.set_voucher(Some(voucher.clone()));
                VoucherOutcome::applied(voucher)
            }
            None => {
                debug!(code = %code, "Voucher rejected");
                cart.set_voucher(None);
                VoucherOutcome::rejected(code)
            }
        }
    }

    // =========================================================================
    // Derived Reads
    // =========================================================================
    // Recomputed from the line list on every call; nothing here is cached.

    /// Executes a closure with read access to the cart.
    pub async fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().await;
        f(&cart)
    }

    /// Total quantity across all lines.
    pub async fn item_count(&self) -> i64 {
        self.with_cart(Cart::item_count).await
    }

    /// Subtotal before discounts.
    pub async fn subtotal(&self) -> Money {
        self.with_cart(Cart::subtotal).await
    }

    /// Discount granted by the active voucher.
    pub async fn voucher_discount(&self) -> Money {
        self.with_cart(Cart::voucher_discount).await
    }

    /// Voucher-adjusted total, clamped at zero.
    pub async fn total(&self) -> Money {
        self.with_cart(Cart::total).await
    }

    /// Full totals summary.
    pub async fn totals(&self) -> CartTotals {
        self.with_cart(|cart| CartTotals::from(cart)).await
    }

    /// Snapshot of the current line items.
    pub async fn lines(&self) -> Vec<CartLine> {
        self.with_cart(|cart| cart.lines().to_vec()).await
    }

    /// The active voucher, if any.
    pub async fn voucher(&self) -> Option<Voucher> {
        self.with_cart(|cart| cart.voucher().cloned()).await
    }

    /// Checks if the cart has no line items.
    pub async fn is_empty(&self) -> bool {
        self.with_cart(Cart::is_empty).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
