//! # Money
//!
//! Fixed-point monetary amount tagged with an ISO 4217 currency code.
//! Represented as integer minor units (cents) rather than a floating
//! point type, so arithmetic stays exact; an operation mixing two
//! currencies is a type error rather than a silent conversion.
//!
//! ## Implements
//!
//! Spec §4.15 — Money: fixed-point decimal with currency tag, never
//! floats; addition/subtraction across currencies is an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when an operation is attempted between two `Money` values of
/// different currencies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("currency mismatch: {lhs} vs {rhs}")]
pub struct CurrencyMismatch {
    pub lhs: String,
    pub rhs: String,
}

/// A monetary amount in integer minor units (cents), tagged with its
/// currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount_cents: i64,
    currency: String,
}

impl Money {
    pub fn new(amount_cents: i64, currency: impl Into<String>) -> Self {
        Self { amount_cents, currency: currency.into() }
    }

    pub fn zero(currency: impl Into<String>) -> Self {
        Self::new(0, currency)
    }

    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    fn check_currency(&self, other: &Money) -> Result<(), CurrencyMismatch> {
        if self.currency != other.currency {
            return Err(CurrencyMismatch { lhs: self.currency.clone(), rhs: other.currency.clone() });
        }
        Ok(())
    }

    pub fn add(&self, other: &Money) -> Result<Money, CurrencyMismatch> {
        self.check_currency(other)?;
        Ok(Money::new(self.amount_cents + other.amount_cents, self.currency.clone()))
    }

    pub fn sub(&self, other: &Money) -> Result<Money, CurrencyMismatch> {
        self.check_currency(other)?;
        Ok(Money::new(self.amount_cents - other.amount_cents, self.currency.clone()))
    }

    /// Scale by an integer factor. Unlike addition, this never crosses
    /// currencies, so it cannot fail.
    pub fn scale(&self, factor: i64) -> Money {
        Money::new(self.amount_cents * factor, self.currency.clone())
    }

    /// True if `other` is in the same currency and does not exceed this
    /// amount — used by escrow release to check a partial release
    /// against the remaining balance.
    pub fn covers(&self, other: &Money) -> Result<bool, CurrencyMismatch> {
        self.check_currency(other)?;
        Ok(self.amount_cents >= other.amount_cents)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        write!(f, "{sign}{}.{:02} {}", abs / 100, abs % 100, self.currency)
    }
}

impl std::ops::Add for Money {
    type Output = Result<Money, CurrencyMismatch>;
    fn add(self, rhs: Money) -> Self::Output {
        Money::add(&self, &rhs)
    }
}

impl std::ops::Sub for Money {
    type Output = Result<Money, CurrencyMismatch>;
    fn sub(self, rhs: Money) -> Self::Output {
        Money::sub(&self, &rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_same_currency() {
        let a = Money::new(1_000, "USD");
        let b = Money::new(250, "USD");
        assert_eq!((a + b).unwrap(), Money::new(1_250, "USD"));
    }

    #[test]
    fn test_add_cross_currency_errors() {
        let a = Money::new(1_000, "USD");
        let b = Money::new(250, "EUR");
        assert!((a + b).is_err());
    }

    #[test]
    fn test_addition_is_associative() {
        let x = Money::new(173, "USD");
        let y = Money::new(-58, "USD");
        let z = Money::new(942, "USD");
        let left = (x.clone().add(&y).unwrap()).add(&z).unwrap();
        let right = x.add(&(y.add(&z).unwrap())).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_scale_preserves_currency() {
        let a = Money::new(300, "USD");
        assert_eq!(a.scale(3), Money::new(900, "USD"));
    }

    #[test]
    fn test_covers_cross_currency_errors() {
        let a = Money::new(1_000, "USD");
        let b = Money::new(100, "EUR");
        assert!(a.covers(&b).is_err());
    }

    #[test]
    fn test_display_formats_cents() {
        let a = Money::new(150_075, "USD");
        assert_eq!(a.to_string(), "1500.75 USD");
    }
}
