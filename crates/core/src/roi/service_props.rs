//! Property-based tests for ROI rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::RoiService;
use super::types::WithdrawalStatus;

fn arb_status() -> impl Strategy<Value = WithdrawalStatus> {
    prop::sample::select(WithdrawalStatus::ALL.to_vec())
}

/// Cents in `1..=max`, as a two-decimal amount.
fn arb_amount(max: i64) -> impl Strategy<Value = Decimal> {
    (1..=max).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    /// Only the immediate successor is reachable.
    #[test]
    fn prop_progression_is_linear(from in arb_status(), to in arb_status()) {
        let from_idx = WithdrawalStatus::ALL.iter().position(|s| *s == from).unwrap();
        let to_idx = WithdrawalStatus::ALL.iter().position(|s| *s == to).unwrap();
        prop_assert_eq!(RoiService::is_valid_transition(from, to), to_idx == from_idx + 1);
    }

    /// Accepting a request never drives the balance below zero.
    #[test]
    fn prop_accepted_requests_keep_balance_non_negative(
        distribution in arb_amount(1_000_000),
        requests in prop::collection::vec(arb_amount(500_000), 0..20),
    ) {
        let mut accepted: Vec<Decimal> = Vec::new();
        for requested in requests {
            if RoiService::validate_withdrawal(true, distribution, &accepted, requested).is_ok() {
                accepted.push(requested);
            }
            prop_assert!(RoiService::available_balance(distribution, &accepted) >= Decimal::ZERO);
        }
    }

    /// The computed amount never exceeds the pool.
    #[test]
    fn prop_amount_bounded_by_pool(
        pool in arb_amount(100_000_000),
        pct_bp in 1i64..=10_000,
    ) {
        let pct = Decimal::new(pct_bp, 2);
        let amount = RoiService::compute_amount(pool, pct).unwrap();
        prop_assert!(amount >= Decimal::ZERO);
        prop_assert!(amount <= pool);
        prop_assert!(amount.scale() <= 2);
    }
}
