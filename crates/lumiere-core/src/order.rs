//! # Order Draft Assembly
//!
//! Builds the immutable order submission payload from cart state, the
//! shipping summary, the payment method and the accepted loyalty
//! redemption. The draft is a pure function of its inputs: it is built once
//! per checkout attempt and never mutated after handoff.
//!
//! ## Discount Ordering
//! The order of application is fixed, not implementer-chosen:
//! ```text
//!   subtotal
//!     − voucher discount   (percentage of subtotal)
//!     − points discount    (points × rate, flat)
//!   = payable total        (clamped at zero)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::loyalty::PointRate;
use crate::money::Money;
use crate::types::{FulfillmentStatus, OrderStatus, PaymentMethod, PaymentStatus};

// =============================================================================
// Payable Total
// =============================================================================

/// The final payable amount: voucher-adjusted cart total minus the points
/// discount, clamped at zero.
pub fn payable_total(cart: &Cart, redeemed_points: i64, rate: PointRate) -> Money {
    cart.total().sub_to_zero(rate.points_value(redeemed_points))
}

/// Formats the free-text shipping summary carried on the order.
pub fn shipping_summary(full_name: &str, phone: &str, street: &str, city: &str) -> String {
    format!(
        "{}, {}, {}, {}",
        full_name.trim(),
        phone.trim(),
        street.trim(),
        city.trim()
    )
}

// =============================================================================
// Order Line
// =============================================================================

/// One order line per cart line, with frozen snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    /// Variant identity.
    pub variant_id: String,

    /// Owning product identity.
    pub product_id: String,

    /// Display name at time of order ("Product - Variant"), frozen.
    pub name: String,

    /// Quantity ordered.
    pub quantity: i64,

    /// Unit price in đồng at time of order, frozen.
    pub unit_price_vnd: i64,

    /// Line total (unit price × quantity).
    pub line_total_vnd: i64,
}

// =============================================================================
// Order Draft
// =============================================================================

/// The fully-assembled order submission payload.
///
/// Derived entirely from Cart + LoyaltyRedemption + ShippingForm +
/// PaymentMethod; built once and handed to the order gateway unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderDraft {
    /// Customer identity, `None` for a guest order.
    pub customer_id: Option<String>,

    /// Always `Pending` at submission.
    pub status: OrderStatus,

    /// `Unpaid` for COD, `Paid` for prepaid methods.
    pub payment_status: PaymentStatus,

    /// Always `Unfulfilled` at submission.
    pub fulfillment_status: FulfillmentStatus,

    /// Selected payment method.
    pub payment_method: PaymentMethod,

    /// Free-text shipping summary.
    pub shipping_summary: String,

    /// Loyalty points redeemed on this order.
    pub redeemed_points: i64,

    /// Final payable amount in đồng.
    pub total_vnd: i64,

    /// One line per cart line.
    pub lines: Vec<OrderLine>,
}

impl OrderDraft {
    /// Assembles the draft from checkout state.
    ///
    /// Fails with `EmptyCart` when there is nothing to order; every other
    /// precondition (shipping fields, points cap) is validated by the
    /// checkout flow before this is called.
    pub fn assemble(
        cart: &Cart,
        customer_id: Option<&str>,
        shipping_summary: String,
        payment_method: PaymentMethod,
        redeemed_points: i64,
        rate: PointRate,
    ) -> CoreResult<OrderDraft> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let payment_status = if payment_method.is_prepaid() {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Unpaid
        };

        let lines = cart
            .lines()
            .iter()
            .map(|l| OrderLine {
                variant_id: l.variant.id.clone(),
                product_id: l.product.id.clone(),
                name: format!("{} - {}", l.product.name, l.variant.name),
                quantity: l.quantity,
                unit_price_vnd: l.variant.price_vnd,
                line_total_vnd: l.line_total().vnd(),
            })
            .collect();

        Ok(OrderDraft {
            customer_id: customer_id.map(str::to_string),
            status: OrderStatus::Pending,
            payment_status,
            fulfillment_status: FulfillmentStatus::Unfulfilled,
            payment_method,
            shipping_summary,
            redeemed_points,
            total_vnd: payable_total(cart, redeemed_points, rate).vnd(),
            lines,
        })
    }

    /// Final payable amount as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_vnd(self.total_vnd)
    }
}

// =============================================================================
// Order Reference
// =============================================================================

/// Reference to a created order, returned by the submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderReference {
    /// Order identifier assigned by the order service.
    pub id: String,

    /// Creation timestamp.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
