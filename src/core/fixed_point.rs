//! Fixed-point amounts for prices, quantities and balances
//!
//! 8 decimal places precision (satoshi resolution), stored as i128.
//! Values built from text, floats, whole units or raw i64 stay within the
//! i64 raw range, so a product or sum of such values always fits; totals and
//! balances use the wider range. Copy type, no panics.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fixed-point number with 8 decimal places
/// Stored as i128 where value = real_value * 100_000_000
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct FixedPoint8(i128);

impl FixedPoint8 {
    /// Number of decimal places
    pub const DECIMALS: u8 = 8;

    /// Scale factor (10^8)
    pub const SCALE: i64 = 100_000_000;

    /// One unit (1.0)
    pub const ONE: Self = Self(100_000_000);

    /// Zero
    pub const ZERO: Self = Self(0);

    /// Maximum value
    pub const MAX: Self = Self(i128::MAX);

    /// Minimum value
    pub const MIN: Self = Self(i128::MIN);

    /// Create from raw i64 value
    #[inline(always)]
    pub const fn from_raw(value: i64) -> Self {
        Self(value as i128)
    }

    /// Create from a whole number of units
    /// Returns None if the scaled value does not fit
    #[inline]
    pub const fn from_units(units: i64) -> Option<Self> {
        match units.checked_mul(Self::SCALE) {
            Some(raw) => Some(Self(raw as i128)),
            None => None,
        }
    }

    /// Get raw value
    #[inline(always)]
    pub const fn as_raw(&self) -> i128 {
        self.0
    }

    /// Create from f64 (snapshot files and config only)
    /// Returns None if value is NaN, infinite, or out of range
    #[inline]
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * Self::SCALE as f64).round();
        if scaled > i64::MAX as f64 || scaled < i64::MIN as f64 {
            return None;
        }
        Some(Self(scaled as i64 as i128))
    }

    /// Convert to f64 (API output)
    #[inline(always)]
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Checked addition - returns None on overflow
    #[inline(always)]
    pub const fn checked_add(&self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction - returns None on overflow
    #[inline(always)]
    pub const fn checked_sub(&self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Saturating addition
    #[inline(always)]
    pub const fn saturating_add(&self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction
    #[inline(always)]
    pub const fn saturating_sub(&self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Multiplication truncated back to 8 decimals
    /// Returns None if the raw product doesn't fit in i128
    #[inline]
    pub fn safe_mul(&self, other: Self) -> Option<Self> {
        self.0.checked_mul(other.0).map(|product| Self(product / Self::SCALE as i128))
    }

    /// Multiplication truncated back to 8 decimals, saturating
    ///
    /// Exact whenever both operands are in the i64 raw range.
    #[inline]
    pub fn saturating_mul(&self, other: Self) -> Self {
        self.safe_mul(other).unwrap_or_else(|| {
            if (self.0 < 0) != (other.0 < 0) {
                Self::MIN
            } else {
                Self::MAX
            }
        })
    }

    /// Division truncated toward zero
    ///
    /// Truncation guarantees `a.safe_div(b).safe_mul(b) <= a` for positive
    /// operands, which is what keeps balances from going negative.
    /// Returns None on division by zero or overflow
    #[inline]
    pub fn safe_div(&self, other: Self) -> Option<Self> {
        self.0
            .checked_mul(Self::SCALE as i128)?
            .checked_div(other.0)
            .map(Self)
    }

    /// Parse from byte slice without allocation
    /// Supports format: "12345.6789" or "12345"
    /// Returns None on invalid format or overflow
    #[inline]
    pub fn parse_bytes(bytes: &[u8]) -> Option<Self> {
        let (negative, digits) = match bytes.first()? {
            b'-' => (true, &bytes[1..]),
            b'+' => (false, &bytes[1..]),
            _ => (false, bytes),
        };
        if digits.is_empty() {
            return None;
        }

        let mut integer_part: i64 = 0;
        let mut fractional_part: i64 = 0;
        let mut fractional_digits: u8 = 0;
        let mut has_decimal = false;
        let mut seen_digit = false;

        for &c in digits {
            if c == b'.' {
                if has_decimal {
                    return None; // Multiple decimal points
                }
                has_decimal = true;
                continue;
            }

            if !c.is_ascii_digit() {
                return None;
            }
            seen_digit = true;
            let digit = (c - b'0') as i64;

            if !has_decimal {
                integer_part = integer_part.checked_mul(10)?.checked_add(digit)?;
            } else if fractional_digits < Self::DECIMALS {
                fractional_part = fractional_part * 10 + digit;
                fractional_digits += 1;
            }
            // Digits beyond 8 decimal places are truncated
        }

        if !seen_digit {
            return None;
        }

        while fractional_digits < Self::DECIMALS {
            fractional_part *= 10;
            fractional_digits += 1;
        }

        let result = integer_part
            .checked_mul(Self::SCALE)?
            .checked_add(fractional_part)?;

        Some(Self::from_raw(if negative { -result } else { result }))
    }

    /// Check if positive
    #[inline(always)]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if negative
    #[inline(always)]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Default for FixedPoint8 {
    #[inline(always)]
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for FixedPoint8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let n = self.0.unsigned_abs();
        let scale = Self::SCALE as u128;
        write!(f, "{}{}.{:08}", sign, n / scale, n % scale)
    }
}

impl FromStr for FixedPoint8 {
    type Err = ParseFixedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_bytes(s.trim().as_bytes()).ok_or_else(|| ParseFixedError(s.to_string()))
    }
}

/// Text that is not a decimal number representable with 8 places
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid decimal amount: {0:?}")]
pub struct ParseFixedError(pub String);

impl Serialize for FixedPoint8 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for FixedPoint8 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FixedPoint8Visitor)
    }
}

/// Accepts JSON/TOML numbers and decimal strings
struct FixedPoint8Visitor;

impl<'de> Visitor<'de> for FixedPoint8Visitor {
    type Value = FixedPoint8;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or decimal string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        FixedPoint8::from_units(v).ok_or_else(|| E::custom(format!("amount {} out of range", v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .ok()
            .and_then(FixedPoint8::from_units)
            .ok_or_else(|| E::custom(format!("amount {} out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        FixedPoint8::from_f64(v).ok_or_else(|| E::custom(format!("amount {} out of range", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}
