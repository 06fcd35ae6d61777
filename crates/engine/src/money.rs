use std::{fmt, ops::Sub, str::FromStr};

use crate::{Currency, EngineError};

/// Signed money amount represented as integer **minor units** (kopecks for
/// the base currency).
///
/// Use this type for all monetary values in the engine (operation amounts,
/// report totals) to avoid floating-point drift. Floating point only appears
/// when a report divides by an exchange rate, see [`Money::convert`].
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount: Money = "1500,5".parse().unwrap();
/// assert_eq!(amount.minor(), 150_050);
/// assert_eq!(amount.format(Currency::Rub), "1500.50 RUB");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest amount a single operation may carry (10 billion in major units).
    ///
    /// A million operations at this cap still sum inside `i64`.
    pub const MAX_AMOUNT: Money = Money(1_000_000_000_000);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Converts a base-currency amount into another currency.
    ///
    /// `rate` is the number of base units per one unit of the target currency,
    /// so the converted amount is `self / rate`, rounded to the nearest minor
    /// unit. A rate of exactly `1.0` returns `self` unchanged.
    ///
    /// `rate` must be finite and strictly positive.
    #[must_use]
    pub fn convert(self, rate: f64) -> Money {
        if rate == 1.0 {
            return self;
        }
        Money((self.0 as f64 / rate).round() as i64)
    }

    /// Converts a foreign amount into the base currency: `self * rate`,
    /// rounded to the nearest minor unit and saturating at the `i64` bounds.
    #[must_use]
    pub fn exchange(self, rate: f64) -> Money {
        Money((self.0 as f64 * rate).round() as i64)
    }

    /// Formats the amount in major units followed by the currency code.
    #[must_use]
    pub fn format(self, currency: Currency) -> String {
        let digits = u32::from(currency.minor_units());
        let scale = 10u64.pow(digits);
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / scale;
        let minor = abs % scale;
        format!(
            "{sign}{major}.{minor:0width$} {code}",
            width = digits as usize,
            code = currency.code()
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let minor_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let major: i64 = major_str.parse().map_err(|_| overflow())?;

        let minor: i64 = match minor_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = major
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(overflow)?;

        let signed = if negative {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_uses_code_suffix() {
        assert_eq!(Money::new(0).format(Currency::Rub), "0.00 RUB");
        assert_eq!(Money::new(1).format(Currency::Usd), "0.01 USD");
        assert_eq!(Money::new(150_050).format(Currency::Rub), "1500.50 RUB");
        assert_eq!(Money::new(-150_050).format(Currency::Rub), "-1500.50 RUB");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("1500,50".parse::<Money>().unwrap().minor(), 150_050);
        assert_eq!("-0.01".parse::<Money>().unwrap().minor(), -1);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().minor(), 230);
    }

    #[test]
    fn parse_rejects_garbage_and_extra_decimals() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        assert_eq!(Money::new(1).checked_add(Money::new(2)), Some(Money::new(3)));
        assert_eq!(Money::new(i64::MAX).checked_add(Money::new(1)), None);
        assert_eq!(Money::new(5).checked_sub(Money::new(7)), Some(Money::new(-2)));
        assert_eq!(Money::new(i64::MIN).checked_sub(Money::new(1)), None);
    }

    #[test]
    fn a_million_capped_amounts_fit() {
        let total = (0..1_000_000).try_fold(Money::ZERO, |acc, _| acc.checked_add(Money::MAX_AMOUNT));
        assert_eq!(total, Some(Money::new(1_000_000_000_000_000_000)));
    }

    #[test]
    fn convert_with_unit_rate_is_identity() {
        for minor in [0, 1, 99, 150_050, -150_050, i64::MAX, i64::MIN] {
            assert_eq!(Money::new(minor).convert(1.0), Money::new(minor));
        }
    }

    #[test]
    fn convert_divides_and_rounds() {
        // 9050.00 RUB at 90.5 RUB per USD
        assert_eq!(Money::new(905_000).convert(90.5), Money::new(10_000));
        // 100.00 RUB at 12.3 RUB per CNY = 8.1300813...
        assert_eq!(Money::new(10_000).convert(12.3), Money::new(813));
    }

    #[test]
    fn exchange_multiplies_and_rounds() {
        // 100.00 USD at 90.5 RUB per USD
        assert_eq!(Money::new(10_000).exchange(90.5), Money::new(905_000));
        assert_eq!(Money::new(1).exchange(0.4), Money::ZERO);
        assert_eq!(Money::MAX_AMOUNT.exchange(1e300), Money::new(i64::MAX));
    }
}
