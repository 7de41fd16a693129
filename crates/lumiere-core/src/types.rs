//! # Domain Types
//!
//! Core domain types used throughout the Lumière engine.
//!
//! ## Snapshot Pattern
//! The product catalog, address book and customer profile are owned by
//! external services. The engine copies the fields it needs into snapshot
//! structs at the moment they enter the cart or the checkout flow, so a cart
//! keeps displaying consistent data even when the catalog changes underneath
//! it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product & Variant
// =============================================================================

/// Catalog product snapshot.
///
/// Only the identity and display fields the cart needs; everything else
/// (images, stock, descriptions) stays with the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier in the catalog.
    pub id: String,

    /// Display name shown in the cart and on the order.
    pub name: String,
}

/// A sellable variant of a product.
///
/// Line items are keyed by variant id: a cart holds at most one line per
/// variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductVariant {
    /// Unique identifier in the catalog.
    pub id: String,

    /// Variant display name ("50ml", "Rouge Allure", ...).
    pub name: String,

    /// Unit price in whole đồng at time of adding (frozen).
    pub price_vnd: i64,
}

impl ProductVariant {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_vnd(self.price_vnd)
    }
}

// =============================================================================
// Shipping Address
// =============================================================================

/// A saved shipping address from the external address book.
///
/// The engine treats this as an immutable value: selecting one copies its
/// fields into the editable shipping form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingAddress {
    /// Address book identifier.
    pub id: String,

    /// Recipient full name.
    pub full_name: String,

    /// Recipient phone number.
    pub phone: String,

    /// Street line.
    pub street: String,

    /// City.
    pub city: String,

    /// Whether the address book flags this as the customer's default.
    pub is_default: bool,
}

// =============================================================================
// Payment Method
// =============================================================================

/// Payment methods the storefront accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cod,
    /// Card payment, captured up front.
    CreditCard,
    /// ZaloPay wallet, captured up front.
    #[serde(rename = "ZALOPAY")]
    ZaloPay,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cod
    }
}

impl PaymentMethod {
    /// Whether payment is captured before the order ships.
    ///
    /// COD orders start unpaid; every other method is charged at checkout.
    #[inline]
    pub const fn is_prepaid(&self) -> bool {
        !matches!(self, PaymentMethod::Cod)
    }
}

// =============================================================================
// Order Statuses
// =============================================================================

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Submitted, awaiting confirmation. Every new order starts here.
    Pending,
    /// Confirmed and handed to fulfillment.
    Confirmed,
    /// Cancelled before fulfillment.
    Cancelled,
}

/// Payment capture status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// No payment captured yet (COD).
    Unpaid,
    /// Captured at checkout (card, wallet).
    Paid,
    /// Returned to the customer.
    Refunded,
}

/// Fulfillment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    /// Nothing shipped yet. Every new order starts here.
    Unfulfilled,
    /// All lines shipped.
    Fulfilled,
}

// =============================================================================
// Customer
// =============================================================================

/// Customer profile snapshot from the external profile service.
///
/// The engine only reads the loyalty balance; identity and contact data stay
/// with the profile service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerSnapshot {
    /// Customer identifier.
    pub id: String,

    /// Redeemable loyalty point balance.
    pub loyalty_points: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
