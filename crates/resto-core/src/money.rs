//! # Money Module
//!
//! Provides the `Money` type for handling menu prices and order totals.
//!
//! ## Integer Minor Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing REAL prices:                                                   │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise, cents)                       │
//! │    All cart math runs on i64; decimals only exist at the storage        │
//! │    boundary (REAL columns, JSON snapshot) and in display.               │
//! │                                                                         │
//! │    REAL 250.0 ──from_major_f64──► Money(25000) ──to_major_f64──► 250.0  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use resto_core::money::Money;
//!
//! let price = Money::from_major_minor(250, 0);   // 250.00
//! let parcel = Money::from_cents(500);           // 5.00
//!
//! let line = price * 3u32 + parcel * 2u32;
//! assert_eq!(line.cents(), 76_000);
//! assert_eq!(line.to_major_f64(), 760.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Number of minor units in one major unit.
const MINOR_PER_MAJOR: i64 = 100;

/// Largest price or parcel charge a menu item may carry: 10,000,000.00.
///
/// Arithmetic saturates instead of overflowing, so even a cart far beyond
/// this bound yields a total rather than a panic.
pub const MAX_PRICE: Money = Money(10_000_000 * MINOR_PER_MAJOR);

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  MenuItem.price ─────────┬──► CartLine units ──► Cart.subtotal          │
/// │                          │                                              │
/// │  MenuItem.parcel_charge ─┴──► takeaway units ──► Cart.parcel_charges    │
/// │                                                                         │
/// │  subtotal + parcel_charges ──► Cart.grand_total ──► Order.total         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use resto_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Converts a decimal major-unit amount (as stored in `REAL` columns and
    /// the JSON snapshot) to minor units.
    ///
    /// Rounds half away from zero. Non-finite input maps to zero and
    /// out-of-range input saturates at the `i64` bounds.
    ///
    /// ```rust
    /// use resto_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_f64(250.0).cents(), 25_000);
    /// assert_eq!(Money::from_major_f64(0.1 + 0.2).cents(), 30);
    /// ```
    pub fn from_major_f64(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        Money((amount * MINOR_PER_MAJOR as f64).round() as i64)
    }

    /// Converts to a decimal major-unit amount for storage.
    #[inline]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a unit count, saturating at the `i64` bounds.
    ///
    /// ```rust
    /// use resto_core::money::Money;
    ///
    /// let chai = Money::from_major_minor(50, 0);
    /// assert_eq!(chai.multiply_quantity(3).cents(), 15_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Formats with a currency symbol and a number of decimals.
    ///
    /// ```rust
    /// use resto_core::money::Money;
    ///
    /// let total = Money::from_cents(76_000);
    /// assert_eq!(total.format_with("₹", 2), "₹760.00");
    /// assert_eq!(total.format_with("Rs ", 0), "Rs 760");
    /// ```
    pub fn format_with(&self, symbol: &str, decimals: u8) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let major = self.major().abs();
        match decimals {
            0 => format!("{sign}{symbol}{major}"),
            d => {
                // Minor units carry two digits; pad or truncate to the requested width
                let minor = format!("{:02}", self.minor());
                let width = d as usize;
                let fraction = if width <= 2 {
                    minor[..width].to_string()
                } else {
                    format!("{minor:0<width$}")
                };
                format!("{sign}{symbol}{major}.{fraction}")
            }
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal display without a currency symbol.
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Decimal Serde Adapter
// =============================================================================

/// Serializes `Money` as a decimal major-unit number.
///
/// Used by the order snapshot so each `menuItem.price` reads `250.0`
/// rather than `25000`:
///
/// ```rust
/// use resto_core::money::{self, Money};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Priced {
///     #[serde(with = "money::as_decimal")]
///     price: Money,
/// }
///
/// let json = serde_json::to_string(&Priced { price: Money::from_cents(25_050) }).unwrap();
/// assert_eq!(json, r#"{"price":250.5}"#);
/// ```
pub mod as_decimal {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(money.to_major_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = f64::deserialize(deserializer)?;
        Ok(Money::from_major_f64(amount))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
