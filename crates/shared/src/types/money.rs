//! Money type with decimal precision and currency.
//!
//! Never use floating-point for money calculations. This type wraps
//! `rust_decimal::Decimal` for arbitrary precision. Report fees are
//! quoted in minor units (cents/kobo) and converted here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary amount with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units (e.g. dollars), two decimal places.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

/// ISO 4217 currency codes accepted by the payment providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Nigerian Naira
    Ngn,
    /// Ghanaian Cedi
    Ghs,
    /// Kenyan Shilling
    Kes,
    /// South African Rand
    Zar,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates an amount from minor units (cents, kobo, pesewas...).
    #[must_use]
    pub fn from_minor(minor: i64, currency: Currency) -> Self {
        Self {
            amount: Decimal::new(minor, 2),
            currency,
        }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns the amount in minor units, rounding half away from zero.
    ///
    /// Returns `None` if the value does not fit in an `i64`.
    #[must_use]
    pub fn minor_units(&self) -> Option<i64> {
        use rust_decimal::prelude::ToPrimitive;
        (self.amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl Currency {
    /// Returns the upper-case ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Ngn => "NGN",
            Self::Ghs => "GHS",
            Self::Kes => "KES",
            Self::Zar => "ZAR",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "NGN" => Ok(Self::Ngn),
            "GHS" => Ok(Self::Ghs),
            "KES" => Ok(Self::Kes),
            "ZAR" => Ok(Self::Zar),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_from_minor() {
        let money = Money::from_minor(640, Currency::Usd);
        assert_eq!(money.amount, dec!(6.40));
        assert_eq!(money.minor_units(), Some(640));
    }

    #[test]
    fn test_minor_units_rounds_half_away() {
        assert_eq!(Money::new(dec!(1.005), Currency::Ngn).minor_units(), Some(101));
        assert_eq!(Money::new(dec!(1.004), Currency::Ngn).minor_units(), Some(100));
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(Currency::Ngn);
        assert!(money.is_zero());
        assert!(!money.is_negative());
        assert_eq!(money.minor_units(), Some(0));
    }

    #[test]
    fn test_money_is_negative() {
        assert!(Money::new(dec!(-10), Currency::Usd).is_negative());
        assert!(!Money::new(dec!(10), Currency::Usd).is_negative());
    }

    #[test]
    fn test_currency_round_trip() {
        for c in [
            Currency::Usd,
            Currency::Ngn,
            Currency::Ghs,
            Currency::Kes,
            Currency::Zar,
        ] {
            assert_eq!(Currency::from_str(&c.to_string()).unwrap(), c);
        }
        assert_eq!(Currency::from_str("ngn").unwrap(), Currency::Ngn);
        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }
}
