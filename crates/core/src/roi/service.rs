//! ROI rules: distribution amounts, withdrawal limits and status progression.

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::RoiError;
use super::types::{DistributionInput, WithdrawalStatus};

/// Stateless service for ROI calculations and transitions.
pub struct RoiService;

impl RoiService {
    /// Computes `round(pool × percentage / 100, 2)`, midpoint away from zero.
    pub fn compute_amount(pool_amount: Decimal, percentage: Decimal) -> Result<Decimal, RoiError> {
        pool_amount
            .checked_mul(percentage)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .map(|v| v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
            .ok_or(RoiError::InvalidPoolAmount(pool_amount))
    }

    /// Validates a new distribution and returns its amount.
    pub fn validate_distribution(input: &DistributionInput) -> Result<Decimal, RoiError> {
        if input.percentage <= Decimal::ZERO || input.percentage > Decimal::ONE_HUNDRED {
            return Err(RoiError::InvalidPercentage(input.percentage));
        }
        if input.pool_amount <= Decimal::ZERO {
            return Err(RoiError::InvalidPoolAmount(input.pool_amount));
        }
        if input.period_start > input.period_end {
            return Err(RoiError::InvalidPeriod);
        }
        Self::compute_amount(input.pool_amount, input.percentage)
    }

    /// Returns what is left on a distribution after existing requests.
    ///
    /// Every request counts, whatever its status.
    #[must_use]
    pub fn available_balance(distribution_amount: Decimal, existing: &[Decimal]) -> Decimal {
        existing
            .iter()
            .fold(distribution_amount, |left, amount| left - amount)
    }

    /// Validates a new withdrawal request against its distribution.
    pub fn validate_withdrawal(
        enabled: bool,
        distribution_amount: Decimal,
        existing: &[Decimal],
        requested: Decimal,
    ) -> Result<(), RoiError> {
        if !enabled {
            return Err(RoiError::DistributionDisabled);
        }
        if requested <= Decimal::ZERO {
            return Err(RoiError::NonPositiveAmount);
        }
        let available = Self::available_balance(distribution_amount, existing);
        if requested > available {
            return Err(RoiError::ExceedsAvailable {
                requested,
                available,
            });
        }
        Ok(())
    }

    /// Moves a withdrawal to its next status.
    pub fn advance(current: WithdrawalStatus) -> Result<WithdrawalStatus, RoiError> {
        current.next().ok_or(RoiError::AlreadyCompleted)
    }

    /// Validates an explicit target status.
    pub fn transition(
        from: WithdrawalStatus,
        to: WithdrawalStatus,
    ) -> Result<WithdrawalStatus, RoiError> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(RoiError::InvalidTransition { from, to })
        }
    }

    /// Checks if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved
    /// - Approved → Sent
    /// - Sent → Completed
    #[must_use]
    pub fn is_valid_transition(from: WithdrawalStatus, to: WithdrawalStatus) -> bool {
        from.next() == Some(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use yaracheck_shared::types::ProfileId;

    fn input(pool: Decimal, pct: Decimal) -> DistributionInput {
        DistributionInput {
            shareholder_id: ProfileId::new(),
            pool_amount: pool,
            percentage: pct,
            period_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_compute_amount() {
        assert_eq!(RoiService::compute_amount(dec!(10000), dec!(12.5)).unwrap(), dec!(1250.00));
        assert_eq!(RoiService::compute_amount(dec!(100), dec!(33.333)).unwrap(), dec!(33.33));
    }

    #[test]
    fn test_compute_amount_rounds_half_away_from_zero() {
        // 0.125 -> 0.13
        assert_eq!(RoiService::compute_amount(dec!(12.5), dec!(1)).unwrap(), dec!(0.13));
        // 0.135 -> 0.14
        assert_eq!(RoiService::compute_amount(dec!(13.5), dec!(1)).unwrap(), dec!(0.14));
    }

    #[test]
    fn test_validate_distribution() {
        assert_eq!(
            RoiService::validate_distribution(&input(dec!(5000), dec!(100))).unwrap(),
            dec!(5000)
        );
        assert!(matches!(
            RoiService::validate_distribution(&input(dec!(5000), dec!(0))),
            Err(RoiError::InvalidPercentage(_))
        ));
        assert!(matches!(
            RoiService::validate_distribution(&input(dec!(5000), dec!(100.01))),
            Err(RoiError::InvalidPercentage(_))
        ));
        assert!(matches!(
            RoiService::validate_distribution(&input(dec!(0), dec!(10))),
            Err(RoiError::InvalidPoolAmount(_))
        ));
    }

    #[test]
    fn test_validate_distribution_period() {
        let mut bad = input(dec!(100), dec!(10));
        bad.period_end = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert!(matches!(
            RoiService::validate_distribution(&bad),
            Err(RoiError::InvalidPeriod)
        ));

        let mut same_day = input(dec!(100), dec!(10));
        same_day.period_end = same_day.period_start;
        assert!(RoiService::validate_distribution(&same_day).is_ok());
    }

    #[test]
    fn test_withdrawal_limits() {
        let existing = [dec!(300), dec!(200)];
        assert_eq!(RoiService::available_balance(dec!(1000), &existing), dec!(500));

        assert!(RoiService::validate_withdrawal(true, dec!(1000), &existing, dec!(500)).is_ok());
        assert!(matches!(
            RoiService::validate_withdrawal(true, dec!(1000), &existing, dec!(500.01)),
            Err(RoiError::ExceedsAvailable { .. })
        ));
        assert!(matches!(
            RoiService::validate_withdrawal(true, dec!(1000), &[], dec!(0)),
            Err(RoiError::NonPositiveAmount)
        ));
        assert!(matches!(
            RoiService::validate_withdrawal(false, dec!(1000), &[], dec!(1)),
            Err(RoiError::DistributionDisabled)
        ));
    }

    #[test]
    fn test_advance_is_linear() {
        assert_eq!(RoiService::advance(WithdrawalStatus::Pending).unwrap(), WithdrawalStatus::Approved);
        assert_eq!(RoiService::advance(WithdrawalStatus::Approved).unwrap(), WithdrawalStatus::Sent);
        assert_eq!(RoiService::advance(WithdrawalStatus::Sent).unwrap(), WithdrawalStatus::Completed);
        assert!(matches!(
            RoiService::advance(WithdrawalStatus::Completed),
            Err(RoiError::AlreadyCompleted)
        ));
    }

    #[test]
    fn test_transition_rejects_skips_and_reversals() {
        assert!(RoiService::transition(WithdrawalStatus::Pending, WithdrawalStatus::Sent).is_err());
        assert!(RoiService::transition(WithdrawalStatus::Sent, WithdrawalStatus::Approved).is_err());
        assert!(RoiService::transition(WithdrawalStatus::Approved, WithdrawalStatus::Sent).is_ok());
    }

    #[test]
    fn test_error_mapping() {
        let err: yaracheck_shared::AppError = RoiError::DistributionDisabled.into();
        assert_eq!(err.status_code(), 422);
        assert_eq!(RoiError::InvalidPeriod.status_code(), 400);
        assert_eq!(
            RoiError::ExceedsAvailable {
                requested: dec!(2),
                available: dec!(1)
            }
            .error_code(),
            "INSUFFICIENT_BALANCE"
        );
    }
}
