//! # Voucher Types
//!
//! Percentage discount vouchers. At most one voucher is active on a cart at
//! a time; applying a new code replaces or clears the previous one.
//!
//! Applying a code is never an error: both acceptance and rejection are
//! ordinary outcomes carrying a user-facing message, modeled as the tagged
//! [`VoucherOutcome`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Voucher
// =============================================================================

/// A percentage discount identified by a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Voucher {
    /// Code as published, e.g. `LUMIERE10`. Matching is case-insensitive.
    pub code: String,

    /// Discount applied against the cart subtotal, in whole percent.
    pub discount_percent: u32,
}

impl Voucher {
    /// Creates a voucher.
    pub fn new(code: impl Into<String>, discount_percent: u32) -> Self {
        Voucher {
            code: code.into(),
            discount_percent,
        }
    }

    /// Discount amount this voucher grants on the given subtotal.
    ///
    /// `subtotal × percent / 100`, truncating.
    #[inline]
    pub fn discount_on(&self, subtotal: Money) -> Money {
        subtotal.percentage(self.discount_percent)
    }

    /// Case-insensitive code comparison.
    #[inline]
    pub fn matches(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }
}

// =============================================================================
// Voucher Outcome
// =============================================================================

/// Result of applying a voucher code to the cart.
///
/// Rejection clears any previously active voucher; both arms carry a
/// message ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "result", rename_all = "camelCase")]
#[ts(export)]
pub enum VoucherOutcome {
    /// The code matched; the voucher is now active on the cart.
    #[serde(rename_all = "camelCase")]
    Applied { voucher: Voucher, message: String },

    /// The code did not match; any active voucher was cleared.
    #[serde(rename_all = "camelCase")]
    Rejected { message: String },
}

impl VoucherOutcome {
    /// Builds the accepted outcome for a matched voucher.
    pub fn applied(voucher: Voucher) -> Self {
        let message = format!(
            "Voucher {} applied: {}% off your order",
            voucher.code, voucher.discount_percent
        );
        VoucherOutcome::Applied { voucher, message }
    }

    /// Builds the rejected outcome for an unknown code.
    pub fn rejected(code: &str) -> Self {
        VoucherOutcome::Rejected {
            message: format!("Voucher code \"{}\" is not valid", code.trim()),
        }
    }

    /// Whether the voucher was accepted.
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, VoucherOutcome::Applied { .. })
    }

    /// The user-facing message for either outcome.
    pub fn message(&self) -> &str {
        match self {
            VoucherOutcome::Applied { message, .. } | VoucherOutcome::Rejected { message } => {
                message
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
