use crate::EngineError;

/// ISO currency code a report can be rendered in.
///
/// Operation amounts are always stored in the base currency ([`Currency::Rub`]).
/// Every other currency exists for display only: a report fetches a rate and
/// divides the stored amounts by it.
///
/// ## Minor units
///
/// The engine stores monetary values as an `i64` number of **minor units** (see `Money`).
/// `minor_units()` returns how many decimal digits are used when converting between:
/// - major units (human input/output, e.g. `1500.50 RUB`)
/// - minor units (stored integers, e.g. `150050`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Currency {
    #[default]
    Rub,
    Usd,
    Eur,
    Cny,
}

impl Currency {
    /// The currency amounts are stored in.
    pub const BASE: Currency = Currency::Rub;

    /// Every currency a report can be requested in, base first.
    pub const ALL: [Currency; 4] = [Currency::Rub, Currency::Usd, Currency::Eur, Currency::Cny];

    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Rub => "RUB",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Cny => "CNY",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Rub | Currency::Usd | Currency::Eur | Currency::Cny => 2,
        }
    }

    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Currency::Rub)
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "RUB" => Ok(Currency::Rub),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "CNY" => Ok(Currency::Cny),
            other => Err(EngineError::UnsupportedCurrency(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Currency::try_from("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::try_from(" CNY ").unwrap(), Currency::Cny);
        assert!(Currency::try_from("GBP").is_err());
    }

    #[test]
    fn only_rub_is_base() {
        assert!(Currency::BASE.is_base());
        assert!(Currency::ALL.iter().filter(|c| c.is_base()).count() == 1);
    }
}
