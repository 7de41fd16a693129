//! # lumiere-checkout: Checkout Orchestration for the Lumière Storefront
//!
//! Drives one checkout attempt: resolves the shipping address, fetches the
//! loyalty balance, accepts a capped points redemption, assembles the
//! immutable order draft and hands it to the order service. On success it
//! resets the session cart.
//!
//! ## Module Organization
//!
//! - [`flow`] - The `CheckoutFlow` state machine
//! - [`form`] - Shipping form with saved-address selection
//! - [`collaborators`] - Address book, customer profile and order gateway
//!   contracts
//! - [`error`] - Checkout error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lumiere_checkout::{CheckoutFlow, ShippingField};
//! use lumiere_core::PaymentMethod;
//!
//! let flow = CheckoutFlow::new(cart, address_book, profiles, orders);
//!
//! flow.begin(Some("cust-1")).await?;          // default address pre-selected
//! flow.set_payment_method(PaymentMethod::ZaloPay)?;
//! flow.redeem_points(300).await?;             // capped by balance and total
//! let order = flow.submit().await?;           // cart resets on success
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collaborators;
pub mod error;
pub mod flow;
pub mod form;

// =============================================================================
// Re-exports
// =============================================================================

pub use collaborators::{
    AddressBook, CollaboratorError, CollaboratorResult, CustomerProfile, OrderGateway,
};
pub use error::{CheckoutError, CheckoutResult};
pub use flow::{CheckoutFlow, CheckoutPhase};
pub use form::{ShippingField, ShippingForm};
