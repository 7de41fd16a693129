//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! Prices on the storefront are Vietnamese đồng, a zero-decimal currency:
//! the smallest unit and the display unit are the same. All arithmetic is
//! integer arithmetic; there is no floating point anywhere in the engine.
//!
//! ## Usage
//! ```rust
//! use lumiere_core::money::Money;
//!
//! let price = Money::from_vnd(500_000);
//!
//! // Voucher math: 10% of 500,000₫
//! let discount = price.percentage(10);
//! assert_eq!(discount.vnd(), 50_000);
//!
//! // Totals never go below zero
//! let total = price.sub_to_zero(Money::from_vnd(600_000));
//! assert!(total.is_zero());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in whole đồng.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate discount math may dip negative before
///   clamping
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole đồng.
    ///
    /// ## Example
    /// ```rust
    /// use lumiere_core::money::Money;
    ///
    /// let price = Money::from_vnd(185_000);
    /// assert_eq!(price.vnd(), 185_000);
    /// ```
    #[inline]
    pub const fn from_vnd(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the amount in whole đồng.
    #[inline]
    pub const fn vnd(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates a percentage of this amount, truncating toward zero.
    ///
    /// This is the voucher discount rule: `subtotal × percent / 100`,
    /// integer division.
    ///
    /// ## Example
    /// ```rust
    /// use lumiere_core::money::Money;
    ///
    /// let subtotal = Money::from_vnd(500_000);
    /// assert_eq!(subtotal.percentage(10).vnd(), 50_000);
    ///
    /// // Truncation: 15% of 333₫ is 49₫, not 49.95₫
    /// assert_eq!(Money::from_vnd(333).percentage(15).vnd(), 49);
    /// ```
    pub fn percentage(&self, percent: u32) -> Money {
        // i128 to prevent overflow on large amounts
        let part = self.0 as i128 * percent as i128 / 100;
        Money::from_vnd(part as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use lumiere_core::money::Money;
    ///
    /// let unit_price = Money::from_vnd(185_000);
    /// assert_eq!(unit_price.multiply_quantity(3).vnd(), 555_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Subtracts, clamping the result at zero.
    ///
    /// Discounts can never drive a total negative.
    ///
    /// ## Example
    /// ```rust
    /// use lumiere_core::money::Money;
    ///
    /// let total = Money::from_vnd(100_000);
    /// assert_eq!(total.sub_to_zero(Money::from_vnd(30_000)).vnd(), 70_000);
    /// assert_eq!(total.sub_to_zero(Money::from_vnd(150_000)).vnd(), 0);
    /// ```
    #[inline]
    pub const fn sub_to_zero(&self, other: Money) -> Money {
        let diff = self.0 - other.0;
        if diff > 0 {
            Money(diff)
        } else {
            Money(0)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// Groups digits in threes with `.` and appends the đồng sign, the
/// convention the storefront uses: `450.000 ₫`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        let offset = digits.len() % 3;
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        write!(f, "{}{} ₫", sign, grouped)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values (unclamped).
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
