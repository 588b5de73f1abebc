//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A bill summed from floats drifts away from the sum of its lines.       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise)                              │
//! │    ₹150.00 = 15000, every line total and bill total is exact           │
//! │    Rounding happens once, where a percentage is applied                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bakehouse_core::money::Money;
//! use bakehouse_core::types::Percentage;
//!
//! let cost = Money::from_cents(10000); // ₹100.00
//! let selling = cost.apply_markup(Percentage::from_percent(50));
//! assert_eq!(selling, Some(Money::from_cents(15000)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use ts_rs::TS;

use crate::types::Percentage;

/// Divides with rounding half away from zero.
///
/// All percentage math funnels through here so that a positive and a
/// negative amount round symmetrically.
fn div_round(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: profit can be negative when a bill is sold at a loss
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  InventoryItem.total_cost ──► ProductIngredient.cost ──► Product cost   │
/// │                                                              │          │
/// │  LineItem.cost_price ◄───────────────────────────────────────┘          │
/// │       │                                                                 │
/// │       └──► × markup ──► LineItem.selling_price ──► LineItem.total       │
/// │                                                          │              │
/// │  Bill.subtotal ◄─────────────────────────────────────────┘              │
/// │       └──► − discount + additional costs ──► Bill.total ──► profit      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use bakehouse_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // ₹10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion.
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

    /// Multiplies money by a quantity. `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use bakehouse_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(15000); // ₹150.00
    /// assert_eq!(unit_price.checked_mul(2), Some(Money::from_cents(30000)));
    /// assert_eq!(unit_price.checked_mul(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// `None` on overflow.
    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums amounts, `None` as soon as the running total overflows.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }

    /// Returns `rate` of this amount, rounded to the nearest minor unit.
    ///
    /// Used for the discount line: `subtotal × discount / 100`.
    ///
    /// ## Example
    /// ```rust
    /// use bakehouse_core::money::Money;
    /// use bakehouse_core::types::Percentage;
    ///
    /// let subtotal = Money::from_cents(30000);
    /// let discount = subtotal.percentage_of(Percentage::from_percent(10));
    /// assert_eq!(discount, Some(Money::from_cents(3000)));
    /// ```
    pub fn percentage_of(&self, rate: Percentage) -> Option<Money> {
        let cents = div_round(self.0 as i128 * rate.bps() as i128, 10_000);
        i64::try_from(cents).ok().map(Money)
    }

    /// Applies a markup: `self × (1 + markup / 100)`, rounded.
    ///
    /// ## Pricing Flow
    /// ```text
    /// cost_price ₹100.00, markup 50%
    ///      │
    ///      ▼
    /// apply_markup() ← THIS FUNCTION
    ///      │
    ///      ▼
    /// selling_price ₹150.00
    /// ```
    ///
    /// `None` when the marked-up price does not fit in an `i64`.
    pub fn apply_markup(&self, markup: Percentage) -> Option<Money> {
        let cents = div_round(self.0 as i128 * (10_000 + markup.bps() as i128), 10_000);
        i64::try_from(cents).ok().map(Money)
    }

    /// Returns the share of this amount covering `part` out of `whole` units.
    ///
    /// Recipe costing uses this: an inventory item bought as 1000 g for
    /// ₹45.00 costs `Money::from_cents(4500).prorate(250.0, 1000.0)` for
    /// 250 g. Returns zero when `whole` is not positive.
    pub fn prorate(&self, part: f64, whole: f64) -> Money {
        if whole <= 0.0 || !whole.is_finite() || !part.is_finite() {
            return Money::zero();
        }
        Money::from_cents((self.0 as f64 * part / whole).round() as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as rupees with two decimals, e.g. `₹10.99` or `-₹5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Plain operators saturate at the i64 bounds. They serve reporting over
// stored figures; bill arithmetic uses the checked methods above.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
