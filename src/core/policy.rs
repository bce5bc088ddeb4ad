//! Amount validation rules
//!
//! Charge and use requests must fall inside an inclusive range. The ranges are
//! plain values so that the service can be configured with different bounds,
//! but [`PointPolicy::default`] carries the production limits.

use crate::types::{Amount, Point, PointError, TransactionType};

/// Inclusive bounds for a single operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountLimits {
    /// Smallest accepted amount
    pub min: Point,
    /// Largest accepted amount
    pub max: Point,
}

impl AmountLimits {
    /// Charge requests: 1,000 to 100,000 points
    pub const CHARGE: AmountLimits = AmountLimits::new(1_000, 100_000);

    /// Use requests: 1,000 to 500,000 points
    pub const USE: AmountLimits = AmountLimits::new(1_000, 500_000);

    /// Create a range from `min` to `max`, both inclusive
    pub const fn new(min: Point, max: Point) -> Self {
        AmountLimits { min, max }
    }

    /// Check `amount` against the range and convert it to a point quantity
    ///
    /// Negative amounts are always rejected.
    pub fn check(&self, tx_type: TransactionType, amount: Amount) -> Result<Point, PointError> {
        match Point::try_from(amount) {
            Ok(points) if (self.min..=self.max).contains(&points) => Ok(points),
            _ => Err(PointError::invalid_amount(
                tx_type, amount, self.min, self.max,
            )),
        }
    }
}

/// Validation limits for every mutating operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointPolicy {
    /// Limits applied to `charge`
    pub charge: AmountLimits,
    /// Limits applied to `use_points`
    pub usage: AmountLimits,
}

impl Default for PointPolicy {
    fn default() -> Self {
        Self {
            charge: AmountLimits::CHARGE,
            usage: AmountLimits::USE,
        }
    }
}

impl PointPolicy {
    /// Validate a charge amount
    pub fn check_charge(&self, amount: Amount) -> Result<Point, PointError> {
        self.charge.check(TransactionType::Charge, amount)
    }

    /// Validate a use amount
    pub fn check_use(&self, amount: Amount) -> Result<Point, PointError> {
        self.usage.check(TransactionType::Use, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::lower_bound(1_000, true)]
    #[case::upper_bound(100_000, true)]
    #[case::inside(4_000, true)]
    #[case::below_lower(999, false)]
    #[case::above_upper(100_001, false)]
    #[case::zero(0, false)]
    #[case::negative(-100, false)]
    fn test_check_charge(#[case] amount: Amount, #[case] accepted: bool) {
        let policy = PointPolicy::default();

        let result = policy.check_charge(amount);

        assert_eq!(result.is_ok(), accepted);
        if accepted {
            assert_eq!(result.unwrap(), amount as Point);
        }
    }

    #[rstest]
    #[case::lower_bound(1_000, true)]
    #[case::upper_bound(500_000, true)]
    #[case::above_charge_limit(200_000, true)]
    #[case::below_lower(300, false)]
    #[case::above_upper(500_001, false)]
    #[case::negative(-100, false)]
    fn test_check_use(#[case] amount: Amount, #[case] accepted: bool) {
        let policy = PointPolicy::default();

        assert_eq!(policy.check_use(amount).is_ok(), accepted);
    }

    #[test]
    fn test_rejection_carries_bounds() {
        let policy = PointPolicy::default();

        let err = policy.check_use(500_001).unwrap_err();

        assert_eq!(
            err,
            PointError::InvalidAmount {
                tx_type: TransactionType::Use,
                amount: 500_001,
                min: 1_000,
                max: 500_000,
            }
        );
        assert_eq!(err.to_string(), "use amount must be between 1,000 and 500,000");
    }

    #[test]
    fn test_custom_limits() {
        let limits = AmountLimits::new(1, 10);

        assert_eq!(limits.check(TransactionType::Charge, 10), Ok(10));
        assert!(limits.check(TransactionType::Charge, 11).is_err());
    }
}
