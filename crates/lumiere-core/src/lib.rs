//! # lumiere-core: Pure Business Logic for the Lumière Storefront
//!
//! This crate is the heart of the cart-and-checkout engine. It contains all
//! pricing and ordering rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Lumière Engine Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront UI (TypeScript)                      │   │
//! │  │    Product page ──► Cart drawer ──► Checkout ──► Confirmation  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │     lumiere-cart (CartStore)   lumiere-checkout (CheckoutFlow)  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lumiere-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │   money   │  │  voucher  │  │  loyalty  │  │   │
//! │  │   │   lines   │  │  integer  │  │  percent  │  │ point cap │  │   │
//! │  │   │  totals   │  │    VND    │  │ discount  │  │ discount  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - Cart lines, merge rules, derived totals
//! - [`money`] - Integer đồng arithmetic (no floating point!)
//! - [`voucher`] - Percentage vouchers and tagged application outcomes
//! - [`loyalty`] - Point conversion and the per-order redemption cap
//! - [`order`] - Immutable order draft assembly
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use lumiere_core::cart::Cart;
//! use lumiere_core::types::{Product, ProductVariant};
//! use lumiere_core::voucher::Voucher;
//!
//! let mut cart = Cart::new();
//! cart.add_item(
//!     Product { id: "p1".into(), name: "Sérum Éclat".into() },
//!     ProductVariant { id: "v1".into(), name: "30ml".into(), price_vnd: 250_000 },
//!     2,
//! ).unwrap();
//!
//! cart.set_voucher(Some(Voucher::new("LUMIERE10", 10)));
//! assert_eq!(cart.total().vnd(), 450_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod loyalty;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;
pub mod voucher;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use lumiere_core::Money` instead of
// `use lumiere_core::money::Money`

pub use cart::{Cart, CartLine, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use loyalty::PointRate;
pub use money::Money;
pub use order::{OrderDraft, OrderLine, OrderReference};
pub use types::*;
pub use voucher::{Voucher, VoucherOutcome};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default point-to-currency conversion rate: 1 loyalty point = 1,000₫.
///
/// Used by [`PointRate::default`]. Promotions can override the rate per
/// checkout flow; the cap math is rate-agnostic.
pub const DEFAULT_VND_PER_POINT: i64 = 1_000;
