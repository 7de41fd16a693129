//! # Checkout Error Types
//!
//! Unified error type for the checkout flow.
//!
//! Three families, matching how the UI reacts:
//! - Local validation (missing field, points over cap, empty cart): show a
//!   field- or form-level message, nothing was sent anywhere
//! - Phase violations (not ready, submission already in flight): the call
//!   was made at the wrong time and was ignored
//! - Collaborator failures (address fetch, submission): retryable, the
//!   checkout returns to Ready with all entered data intact

use thiserror::Error;

use crate::collaborators::CollaboratorError;
use crate::flow::CheckoutPhase;
use lumiere_cart::StoreError;
use lumiere_core::{CoreError, ValidationError};

/// Checkout flow errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The operation is not allowed in the current phase.
    #[error("operation not allowed in the {0} phase")]
    InvalidPhase(CheckoutPhase),

    /// A submission is already outstanding; the call was not forwarded.
    #[error("an order submission is already in progress")]
    SubmissionInFlight,

    /// The cart has no line items to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// A shipping field or redemption input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested redemption exceeds the recomputed cap.
    #[error("Cannot redeem {requested} points: only {cap} usable for this order")]
    PointsExceedCap { requested: i64, cap: i64 },

    /// The selected saved address is not among the candidates.
    #[error("unknown saved address: {0}")]
    UnknownAddress(String),

    /// Saving an address requires an authenticated customer.
    #[error("sign in to save addresses")]
    NotAuthenticated,

    /// Fetching saved addresses failed. Retryable.
    #[error("could not load saved addresses: {0}")]
    AddressLookup(#[source] CollaboratorError),

    /// Fetching the customer profile failed. Retryable.
    #[error("could not load customer profile: {0}")]
    Profile(#[source] CollaboratorError),

    /// The order service failed or rejected the submission. Retryable.
    #[error("order submission failed: {0}")]
    Submission(#[source] CollaboratorError),

    /// The cart store failed underneath checkout.
    #[error(transparent)]
    Cart(#[from] StoreError),
}

impl CheckoutError {
    /// Whether retrying the same call can succeed without changing input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::AddressLookup(_)
                | CheckoutError::Profile(_)
                | CheckoutError::Submission(_)
                | CheckoutError::Cart(_)
        )
    }
}

/// Lifts domain errors raised during draft assembly.
impl From<CoreError> for CheckoutError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyCart => CheckoutError::EmptyCart,
            CoreError::PointsExceedCap { requested, cap } => {
                CheckoutError::PointsExceedCap { requested, cap }
            }
            CoreError::Validation(e) => CheckoutError::Validation(e),
        }
    }
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Unit Tests
// =============================================================================
