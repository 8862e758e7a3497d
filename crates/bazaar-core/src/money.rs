//! # Money Module
//!
//! Provides the `Money` type for handling prices and discounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    1000 × 0.07 = 70.00000000000001  ❌ WRONG!                            │
//! │                                                                         │
//! │  A price badge, a cart line and a quotation line computing the same     │
//! │  discount with floats can disagree in the last digit.                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Scaled Rates                             │
//! │    100000 cents × 7% → i128 math, ONE rounding → 7000 cents, always     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::money::Money;
//!
//! let price = Money::from_cents(100_000);
//! let off = price.percent_of(20.0);
//! assert_eq!(off.cents(), 20_000);
//! assert_eq!((price - off).cents(), 80_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

/// Rate units per percent: rates are applied in millionths of a percent.
const RATE_UNITS_PER_PERCENT: f64 = 1_000_000.0;

/// Rate units per whole (100%).
const RATE_SCALE: i128 = 100 * 1_000_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents, paisa, ...).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate differences (e.g. MRP minus final price)
///   may go negative before they are clamped
/// - **Single field tuple struct**: serializes as a bare integer
///
/// ## Where Money is Used
/// ```text
/// Product.price_cents ──► calculate_product_price ──┬──► product card badge
///                                                   ├──► cart line total
///                                                   └──► quotation line
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts an amount typed in major units (e.g. a fixed offer of
    /// "600" entered by an admin) into cents, rounding half away from zero.
    ///
    /// Non-finite input yields zero. This is the only float entry point and
    /// it exists for admin-entered offer values; catalog prices are always
    /// stored in cents.
    ///
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_units(600.0).cents(), 60_000);
    /// assert_eq!(Money::from_major_units(12.5).cents(), 1250);
    /// assert_eq!(Money::from_major_units(f64::NAN).cents(), 0);
    /// ```
    pub fn from_major_units(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        // `as` saturates on overflow
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (rupees, dollars).
    ///
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).major(), 10);
    /// assert_eq!(Money::from_cents(-550).major(), -5);
    /// ```
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Clamps negative values to zero.
    ///
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-300).non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(300).non_negative().cents(), 300);
    /// ```
    #[inline]
    pub fn non_negative(self) -> Self {
        self.max(Money::zero())
    }

    /// Takes `percent` percent of this amount (20.0 = 20%), rounding half up
    /// to whole cents exactly once.
    ///
    /// ## Implementation
    /// The rate is scaled to millionths of a percent, then
    /// `(amount * rate + SCALE / 2) / SCALE` runs in i128. Rates typed with up
    /// to six decimals are applied without any intermediate rounding.
    /// Zero, negative and non-finite rates yield zero.
    ///
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let price = Money::from_cents(1000);
    /// // 1000 × 8.25% = 82.5 → 83
    /// assert_eq!(price.percent_of(8.25).cents(), 83);
    /// // 100000 × 12.345% = 12345, not rounded through 12.35%
    /// assert_eq!(Money::from_cents(100_000).percent_of(12.345).cents(), 12_345);
    /// ```
    pub fn percent_of(&self, percent: f64) -> Money {
        if !percent.is_finite() || percent <= 0.0 {
            return Money::zero();
        }
        // `as` saturates on overflow
        let rate = (percent * RATE_UNITS_PER_PERCENT).round() as i128;
        let scaled = (self.0 as i128)
            .saturating_mul(rate)
            .saturating_add(RATE_SCALE / 2);
        let cents = scaled / RATE_SCALE;
        Money(cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Display shows the plain decimal amount without a currency symbol.
///
/// ## Note
/// Currency symbols and decimal places belong to the register's
/// configuration (`ConfigState::format_currency`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::zero()), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_percent_of() {
        let price = Money::from_cents(100_000);
        assert_eq!(price.percent_of(20.0).cents(), 20_000);
        assert_eq!(price.percent_of(0.0), Money::zero());
        // 333 × 50% = 166.5 → 167
        assert_eq!(Money::from_cents(333).percent_of(50.0).cents(), 167);
    }

    #[test]
    fn test_percent_of_keeps_fractional_rates() {
        // 12.345% must not become 12.35% first
        assert_eq!(Money::from_cents(100_000).percent_of(12.345).cents(), 12_345);
        assert_eq!(Money::from_cents(100_000).percent_of(0.075).cents(), 75);
        // 999 × 33.333% = 332.99667 → 333
        assert_eq!(Money::from_cents(999).percent_of(33.333).cents(), 333);
    }

    #[test]
    fn test_percent_of_rejects_bad_rates() {
        let price = Money::from_cents(100_000);
        assert_eq!(price.percent_of(-5.0), Money::zero());
        assert_eq!(price.percent_of(f64::NAN), Money::zero());
        assert_eq!(price.percent_of(f64::INFINITY), Money::zero());
    }

    #[test]
    fn test_percent_of_large_rate_does_not_overflow() {
        let price = Money::from_cents(i64::MAX / 2);
        let off = price.percent_of(1.0e30);
        assert_eq!(off.cents(), i64::MAX);
    }

    #[test]
    fn test_from_major_units() {
        assert_eq!(Money::from_major_units(600.0).cents(), 60_000);
        assert_eq!(Money::from_major_units(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_major_units(-2.5).cents(), -250);
        assert_eq!(Money::from_major_units(f64::INFINITY), Money::zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.non_negative(), Money::zero());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    }
}
