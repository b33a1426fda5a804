use crate::Result;

use std::fmt;

use serde::{Deserialize, Serialize};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoneyError {
    #[error("Overflow error while applying {0} operation on {1} and {2}")]
    Overflow(&'static str, Money, Money),

    #[error("Underflow error while applying {0} operation on {1} and {2}")]
    Underflow(&'static str, Money, Money),

    #[error("Money parse error: {0}, {1:?}")]
    Parse(&'static str, String),
}

/// Whole game currency units. Balances may go negative, amounts never do.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);

    /// Parses a whole number of units, allowing a leading sign and surrounding whitespace
    pub fn parse(string: &str) -> Result<Self> {
        let trimmed = string.trim();

        if trimmed.is_empty() {
            Err(MoneyError::Parse("Empty value", string.to_string()))?
        }

        if trimmed.contains('.') {
            Err(MoneyError::Parse("Fractional values not supported", string.to_string()))?
        }

        let value: i64 = trimmed
            .parse()
            .map_err(|_| MoneyError::Parse("Not an integer", string.to_string()))?;

        return Ok(Money(value));
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Self) -> Result<Self> {
        let sum = self.0.checked_add(other.0).ok_or_else(|| {
            if other.0 > 0 {
                MoneyError::Overflow("add", self, other)
            } else {
                MoneyError::Underflow("add", self, other)
            }
        })?;

        return Ok(Money(sum));
    }

    pub fn checked_sub(self, other: Self) -> Result<Self> {
        let diff = self.0.checked_sub(other.0).ok_or_else(|| {
            if other.0 < 0 {
                MoneyError::Overflow("sub", self, other)
            } else {
                MoneyError::Underflow("sub", self, other)
            }
        })?;

        return Ok(Money(diff));
    }

    pub fn add(&mut self, other: &Self) -> Result {
        *self = self.checked_add(*other)?;
        return Ok(());
    }

    pub fn sub(&mut self, other: &Self) -> Result {
        *self = self.checked_sub(*other)?;
        return Ok(());
    }
}

/// Formats as `$1,500` / `-$200`
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if self.is_negative() { "-" } else { "" };

        return write!(f, "{sign}${grouped}");
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Money(value)
    }
}
