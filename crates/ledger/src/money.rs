use std::{
    fmt,
    ops::{AddAssign, Sub},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{LedgerError, ResultLedger};

/// Whole digits the `DECIMAL(10, 2)` amount column holds.
const MAX_WHOLE_DIGITS: u32 = 8;
/// SQLite keeps a NUMERIC value as a REAL, exact up to this many digits.
const MAX_SIGNIFICANT_DIGITS: usize = 15;

/// An exact decimal amount of money.
///
/// Amounts keep whatever scale they were entered with; displaying one
/// shows at least two decimals. Equality is numeric, so `1000` and
/// `1000.00` are the same amount.
///
/// ```rust
/// use ledger::Money;
///
/// let amount: Money = "10,5".parse().unwrap();
/// assert_eq!(amount, Money::from_cents(1050));
/// assert_eq!(amount.to_string(), "10.50");
/// assert_eq!("12.345".parse::<Money>().unwrap().to_string(), "12.345");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    #[must_use]
    pub fn amount(self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Fails unless the amount is read back unchanged from the `amount`
    /// column.
    pub(crate) fn check_storable(self) -> ResultLedger<()> {
        let limit = Decimal::from(10_i64.pow(MAX_WHOLE_DIGITS));
        if self.0.abs() >= limit {
            return Err(LedgerError::Validation(format!(
                "amount must be less than {limit}"
            )));
        }
        let digits = self.0.normalize().mantissa().unsigned_abs().to_string();
        if digits.len() > MAX_SIGNIFICANT_DIGITS {
            return Err(LedgerError::Validation(format!(
                "amount has more than {MAX_SIGNIFICANT_DIGITS} significant digits"
            )));
        }
        Ok(())
    }

    /// Decodes the text of a stored amount. SQLite renders large or tiny
    /// REAL values in exponent form.
    pub(crate) fn from_stored(text: &str) -> Option<Self> {
        let text = text.trim();
        Decimal::from_str_exact(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok()
            .map(Self)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

/// At least two decimals; extra decimals are kept. The same text is bound
/// into the `amount` column.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0.normalize();
        if value.scale() < 2 {
            value.rescale(2);
        }
        fmt::Display::fmt(&value, f)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl FromStr for Money {
    type Err = LedgerError;

    /// Parses an amount typed by a user: an optional sign, digits, and an
    /// optional `.` or `,` followed by more digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::Validation(format!("invalid amount: {s}"));

        let trimmed = s.trim();
        let (sign, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = unsigned.split_once(['.', ',']).unwrap_or((unsigned, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid());
        }

        let canonical = if fraction.is_empty() {
            format!("{sign}{whole}")
        } else {
            format!("{sign}{whole}.{fraction}")
        };
        Decimal::from_str_exact(&canonical)
            .map(Self)
            .map_err(|_| LedgerError::Validation(format!("amount has too many digits: {s}")))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
