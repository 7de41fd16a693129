//! # Loyalty Points
//!
//! Loyalty-point redemption math. Points convert to đồng at a fixed rate
//! and are redeemed against the voucher-adjusted order total, capped by
//! both the customer's balance and what the order can absorb.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::DEFAULT_VND_PER_POINT;

// =============================================================================
// Point Rate
// =============================================================================

/// Point-to-currency conversion rate in đồng per point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PointRate(i64);

impl PointRate {
    /// Creates a rate from đồng per point. Rate must be positive.
    #[inline]
    pub const fn vnd_per_point(rate: i64) -> Self {
        PointRate(rate)
    }

    /// The rate in đồng per point.
    #[inline]
    pub const fn rate(&self) -> i64 {
        self.0
    }

    /// Currency value of a number of points.
    #[inline]
    pub fn points_value(&self, points: i64) -> Money {
        Money::from_vnd(points.saturating_mul(self.0))
    }

    /// The redemption cap for one checkout attempt.
    ///
    /// `min(balance, floor(payable ÷ rate))`: a customer can never redeem
    /// more points than they own, nor more than the order total can absorb.
    ///
    /// ## Example
    /// ```rust
    /// use lumiere_core::loyalty::PointRate;
    /// use lumiere_core::money::Money;
    ///
    /// let rate = PointRate::vnd_per_point(1_000);
    /// let cap = rate.redeemable_points(10_000, Money::from_vnd(300_000));
    /// assert_eq!(cap, 300);
    /// ```
    pub fn redeemable_points(&self, balance: i64, payable: Money) -> i64 {
        let absorbable = payable.vnd().max(0) / self.0;
        balance.max(0).min(absorbable)
    }
}

impl Default for PointRate {
    fn default() -> Self {
        PointRate(DEFAULT_VND_PER_POINT)
    }
}

// =============================================================================
// Redemption Validation
// =============================================================================

/// Validates a redemption request against the current cap.
///
/// ## Behavior
/// - Negative requests are a validation error
/// - Zero is always allowed (clears the redemption)
/// - A request above the cap is refused outright; nothing is clamped
pub fn validate_redemption(
    rate: PointRate,
    requested: i64,
    balance: i64,
    payable: Money,
) -> CoreResult<()> {
    if requested < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "points".to_string(),
        }
        .into());
    }

    let cap = rate.redeemable_points(balance, payable);
    if requested > cap {
        return Err(CoreError::PointsExceedCap { requested, cap });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_value() {
        let rate = PointRate::vnd_per_point(1_000);
        assert_eq!(rate.points_value(300), Money::from_vnd(300_000));
        assert_eq!(rate.points_value(0), Money::zero());
    }

    #[test]
    fn test_cap_limited_by_total() {
        // Balance 10,000 points, total 300,000₫ at 1,000₫/point: the order
        // can only absorb 300 points.
        let rate = PointRate::vnd_per_point(1_000);
        assert_eq!(rate.redeemable_points(10_000, Money::from_vnd(300_000)), 300);
    }

    #[test]
    fn test_cap_limited_by_balance() {
        let rate = PointRate::vnd_per_point(1_000);
        assert_eq!(rate.redeemable_points(50, Money::from_vnd(300_000)), 50);
    }

    #[test]
    fn test_cap_floors_partial_point() {
        // 1,999₫ of headroom is still only 1 whole point
        let rate = PointRate::vnd_per_point(1_000);
        assert_eq!(rate.redeemable_points(10, Money::from_vnd(1_999)), 1);
    }

    #[test]
    fn test_validate_redemption_at_cap() {
        let rate = PointRate::vnd_per_point(1_000);
        let payable = Money::from_vnd(300_000);

        assert!(validate_redemption(rate, 300, 10_000, payable).is_ok());
        assert!(validate_redemption(rate, 0, 10_000, payable).is_ok());
    }

    #[test]
    fn test_validate_redemption_over_cap_refused() {
        let rate = PointRate::vnd_per_point(1_000);
        let payable = Money::from_vnd(300_000);

        let err = validate_redemption(rate, 301, 10_000, payable).unwrap_err();
        assert!(matches!(
            err,
            CoreError::PointsExceedCap {
                requested: 301,
                cap: 300
            }
        ));
    }

    #[test]
    fn test_validate_redemption_negative_refused() {
        let rate = PointRate::vnd_per_point(1_000);
        let err = validate_redemption(rate, -1, 10_000, Money::from_vnd(300_000)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_default_rate() {
        assert_eq!(PointRate::default().rate(), 1_000);
    }
}
