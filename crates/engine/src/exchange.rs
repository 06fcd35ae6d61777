//! Admin-maintained exchange rates.
//!
//! Unlike [`Currency`](crate::Currency), which is the fixed set a report can be
//! rendered in, this directory is free-form: admins add, re-rate and remove
//! currencies at runtime, and users convert amounts into the base currency
//! with the stored rate.

use sea_orm::entity::prelude::*;

use crate::{EngineError, Money, ResultEngine};

const MAX_NAME_LEN: usize = 16;

/// A currency of the directory and its rate in base units per one unit.
#[derive(Clone, Debug, PartialEq)]
pub struct ExchangeRate {
    pub name: String,
    pub rate: f64,
}

impl ExchangeRate {
    /// Canonical form of a currency name: trimmed and upper-cased.
    ///
    /// Empty names, names with inner whitespace and names longer than 16
    /// characters are rejected.
    pub fn normalize_name(input: &str) -> ResultEngine<String> {
        let name = input.trim().to_uppercase();
        if name.is_empty() {
            return Err(EngineError::InvalidName(
                "currency name must not be empty".to_string(),
            ));
        }
        if name.chars().any(char::is_whitespace) || name.chars().count() > MAX_NAME_LEN {
            return Err(EngineError::InvalidName(format!(
                "`{name}` is not a currency name"
            )));
        }
        Ok(name)
    }

    /// Rates must be finite and strictly positive.
    pub fn check_rate(rate: f64) -> ResultEngine<f64> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(EngineError::InvalidRate(rate.to_string()));
        }
        Ok(rate)
    }

    /// `amount` of this currency expressed in the base currency.
    #[must_use]
    pub fn to_base(&self, amount: Money) -> Money {
        amount.exchange(self.rate)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "currencies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub currency_name: String,
    pub rate: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ExchangeRate {
    fn from(model: Model) -> Self {
        Self {
            name: model.currency_name,
            rate: model.rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_upper_cased() {
        assert_eq!(ExchangeRate::normalize_name(" usd ").unwrap(), "USD");
        assert!(ExchangeRate::normalize_name("   ").is_err());
        assert!(ExchangeRate::normalize_name("US D").is_err());
        assert!(ExchangeRate::normalize_name("ABCDEFGHIJKLMNOPQ").is_err());
    }

    #[test]
    fn rate_must_be_finite_and_positive() {
        assert_eq!(ExchangeRate::check_rate(90.5).unwrap(), 90.5);
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ExchangeRate::check_rate(bad),
                Err(EngineError::InvalidRate(_))
            ));
        }
    }

    #[test]
    fn to_base_multiplies_by_the_rate() {
        let usd = ExchangeRate {
            name: "USD".to_string(),
            rate: 90.5,
        };
        assert_eq!(usd.to_base(Money::new(10_000)), Money::new(905_000));
    }
}
