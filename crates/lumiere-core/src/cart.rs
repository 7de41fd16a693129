//! # Cart Math
//!
//! The pure cart model: an ordered list of line items plus at most one
//! active voucher. No I/O here; persistence and voucher lookup live in
//! `lumiere-cart`.
//!
//! ## Invariants
//! - At most one line per variant id (adding an existing variant increases
//!   its quantity)
//! - Line quantity is always positive (dropping to zero or below removes
//!   the line)
//! - Derived figures (count, subtotal, discount, total) are recomputed on
//!   every access, never cached
//! - Total = subtotal − voucher discount, clamped at zero

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{Product, ProductVariant};
use crate::validation::{validate_quantity, validate_unit_price};
use crate::voucher::Voucher;

// =============================================================================
// Cart Line
// =============================================================================

/// One variant-quantity pair in the cart.
///
/// Product and variant are frozen snapshots taken when the line was added;
/// this is also exactly the record shape the cart persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    /// Product snapshot (frozen).
    pub product: Product,

    /// Variant snapshot with the frozen unit price.
    pub variant: ProductVariant,

    /// Quantity in cart, always positive.
    pub quantity: i64,
}

impl CartLine {
    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.variant.price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: ordered line items plus at most one active voucher.
///
/// Insertion order is kept for display; correctness never depends on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
    voucher: Option<Voucher>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            voucher: None,
        }
    }

    /// Rebuilds a cart from restored line records.
    ///
    /// Restored data is pushed through the same merge rules as live
    /// additions, so a snapshot that somehow carries duplicate variant ids
    /// or non-positive quantities still yields a cart that upholds the
    /// invariants. The voucher is session-scoped and never restored.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Cart::new();
        for line in lines {
            if line.quantity > 0 {
                let _ = cart.add_item(line.product, line.variant, line.quantity);
            }
        }
        cart
    }

    /// Adds a variant to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - Quantity must be positive, otherwise a validation error
    /// - Existing line for `variant.id`: quantity increases
    /// - Otherwise a new line is appended
    ///
    /// No upper bound is enforced here; stock limits belong to the catalog
    /// service.
    pub fn add_item(
        &mut self,
        product: Product,
        variant: ProductVariant,
        quantity: i64,
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;
        validate_unit_price(variant.price_vnd)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.variant.id == variant.id) {
            line.quantity += quantity;
            return Ok(());
        }

        self.lines.push(CartLine {
            product,
            variant,
            quantity,
        });
        Ok(())
    }

    /// Removes the line for a variant id. No-op when absent.
    pub fn remove_item(&mut self, variant_id: &str) {
        self.lines.retain(|l| l.variant.id != variant_id);
    }

    /// Overwrites the quantity for a variant id.
    ///
    /// ## Behavior
    /// - `quantity ≤ 0` behaves as `remove_item`
    /// - Absent variant id is a no-op
    /// - Idempotent: setting the same quantity twice is the same state
    pub fn set_quantity(&mut self, variant_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(variant_id);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.variant.id == variant_id) {
            line.quantity = quantity;
        }
    }

    /// Empties all line items and clears the active voucher.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.voucher = None;
    }

    /// Replaces the active voucher.
    pub fn set_voucher(&mut self, voucher: Option<Voucher>) {
        self.voucher = voucher;
    }

    /// The active voucher, if any.
    pub fn voucher(&self) -> Option<&Voucher> {
        self.voucher.as_ref()
    }

    /// The line items in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Checks if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines, the cart badge count.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Calculates the subtotal before any discount.
    pub fn subtotal(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.line_total())
    }

    /// Discount granted by the active voucher, zero when none is applied.
    pub fn voucher_discount(&self) -> Money {
        match &self.voucher {
            Some(v) => v.discount_on(self.subtotal()),
            None => Money::zero(),
        }
    }

    /// Voucher-adjusted total, clamped at zero.
    ///
    /// Loyalty-point redemption is applied on top of this by the checkout
    /// flow; it is not cart state.
    pub fn total(&self) -> Money {
        self.subtotal().sub_to_zero(self.voucher_discount())
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    pub item_count: i64,
    pub subtotal_vnd: i64,
    pub voucher_discount_vnd: i64,
    pub total_vnd: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            item_count: cart.item_count(),
            subtotal_vnd: cart.subtotal().vnd(),
            voucher_discount_vnd: cart.voucher_discount().vnd(),
            total_vnd: cart.total().vnd(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
