//! # Money Module
//!
//! Provides the `Money` type for prices, costs and invoice totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer amounts in the smallest currency unit            │
//! │    VND has no minor unit, so 1 unit = 1 đồng                            │
//! │    10.000 đ × 2 + 5.000 đ = 25.000 đ, exactly                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! A `Money` is stored as a bare JSON number (`"standard_price": 10000`).
//! Records written by a float-parsing client may carry fractional values
//! (`10000.0`, `12.5`); those are accepted and rounded half away from zero.
//!
//! ## Usage
//! ```rust
//! use scanpos_core::money::Money;
//!
//! let price = Money::from_units(10_000);
//! let line = price.checked_mul(2).unwrap();
//! assert_eq!(line + Money::from_units(5_000), Money::from_units(25_000));
//! assert_eq!(Money::from_units(25_000).to_string(), "25.000");
//! ```
//!
//! The operators (`+`, `-`, `*`, `sum`) panic on overflow in every build
//! profile. Totals built from user input go through the `checked_*` methods.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: differences (price - cost) may be negative
/// - **Single field tuple struct**: zero-cost wrapper that serializes as a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the amount in units.
    #[inline]
    pub const fn units(&self) -> i64 {
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Rounds a floating point amount to the nearest unit.
    ///
    /// Returns `None` for NaN, infinities and values outside the `i64` range.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let rounded = value.round();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
            return None;
        }
        Some(Money(rounded as i64))
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Subtracts `other`, returning `None` on overflow.
    #[inline]
    pub const fn checked_sub(self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use scanpos_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(5_000).checked_mul(3), Some(Money::from_units(15_000)));
    /// assert_eq!(Money::from_units(i64::MAX).checked_mul(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Formats the amount with `separator` between groups of three digits.
    ///
    /// ```rust
    /// use scanpos_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(1_234_567).grouped('.'), "1.234.567");
    /// assert_eq!(Money::from_units(-5_000).grouped(','), "-5,000");
    /// ```
    pub fn grouped(&self, separator: char) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if self.0 < 0 {
            out.push('-');
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(separator);
            }
            out.push(ch);
        }
        out
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display groups thousands with `.` the way Vietnamese receipts print them.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.grouped('.'))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// # Panics
///
/// Panics if the sum overflows. Use [`Money::checked_add`] otherwise.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        self.checked_add(other)
            .unwrap_or_else(|| panic!("overflow when adding amounts"))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// # Panics
///
/// Panics if the difference overflows. Use [`Money::checked_sub`] otherwise.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        self.checked_sub(other)
            .unwrap_or_else(|| panic!("overflow when subtracting amounts"))
    }
}

/// Multiplication by a quantity.
///
/// # Panics
///
/// Panics if the product overflows. Use [`Money::checked_mul`] otherwise.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.checked_mul(qty)
            .unwrap_or_else(|| panic!("overflow when multiplying amount by {qty}"))
    }
}

/// # Panics
///
/// Panics on overflow, like `+`.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| {
            acc.checked_add(m)
                .unwrap_or_else(|| panic!("overflow when adding amounts"))
        })
    }
}

// =============================================================================
// Deserialization
// =============================================================================

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a finite number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map(Money)
            .map_err(|_| E::custom(format!("amount {v} is out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_f64(v).ok_or_else(|| E::custom(format!("amount {v} is not representable")))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(10_000);
        let b = Money::from_units(5_000);

        assert_eq!((a + b).units(), 15_000);
        assert_eq!((a - b).units(), 5_000);
        assert_eq!((a * 3).units(), 30_000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.units(), 20_000);
    }

    #[test]
    #[should_panic(expected = "overflow when adding amounts")]
    fn test_add_overflow_panics() {
        let _ = Money::from_units(i64::MAX) + Money::from_units(1);
    }

    #[test]
    #[should_panic(expected = "overflow when subtracting amounts")]
    fn test_sub_overflow_panics() {
        let _ = Money::from_units(i64::MIN) - Money::from_units(1);
    }

    #[test]
    #[should_panic(expected = "overflow when multiplying amount by 2")]
    fn test_mul_overflow_panics() {
        let _ = Money::from_units(i64::MAX) * 2;
    }

    #[test]
    #[should_panic(expected = "overflow when adding amounts")]
    fn test_sum_overflow_panics() {
        let _: Money = [Money::from_units(i64::MAX), Money::from_units(1)]
            .into_iter()
            .sum();
    }

    #[test]
    fn test_checked_overflow() {
        assert_eq!(Money::from_units(i64::MAX).checked_add(Money::from_units(1)), None);
        assert_eq!(Money::from_units(i64::MAX / 2 + 1).checked_mul(2), None);
        assert_eq!(Money::from_units(i64::MIN).checked_sub(Money::from_units(1)), None);
        assert_eq!(Money::from_units(7).checked_mul(6), Some(Money::from_units(42)));
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_units(0).to_string(), "0");
        assert_eq!(Money::from_units(999).to_string(), "999");
        assert_eq!(Money::from_units(25_000).to_string(), "25.000");
        assert_eq!(Money::from_units(1_000_000).to_string(), "1.000.000");
        assert_eq!(Money::from_units(-12_500).to_string(), "-12.500");
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&Money::from_units(10_000)).unwrap();
        assert_eq!(json, "10000");
    }

    #[test]
    fn test_deserializes_integers_and_floats() {
        let int: Money = serde_json::from_str("10000").unwrap();
        assert_eq!(int, Money::from_units(10_000));

        let float: Money = serde_json::from_str("10000.0").unwrap();
        assert_eq!(float, Money::from_units(10_000));

        let half: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(half, Money::from_units(13));
    }

    #[test]
    fn test_rejects_non_numbers() {
        assert!(serde_json::from_str::<Money>("\"10000\"").is_err());
        assert!(serde_json::from_str::<Money>("null").is_err());
        assert!(serde_json::from_str::<Money>("1e300").is_err());
    }

    #[test]
    fn test_from_f64_edges() {
        assert_eq!(Money::from_f64(f64::NAN), None);
        assert_eq!(Money::from_f64(f64::INFINITY), None);
        assert_eq!(Money::from_f64(-0.4), Some(Money::zero()));
        assert_eq!(Money::from_f64(2.5), Some(Money::from_units(3)));
    }
}
