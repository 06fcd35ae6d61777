//! Financial operations.
//!
//! An `Operation` is an income or an expense recorded by a registered user in
//! the base currency. Operations are immutable once stored.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Income,
    Expense,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for OperationKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidKind(other.to_string())),
        }
    }
}

/// A stored operation, as read back for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub amount: Money,
    pub date: NaiveDate,
}

impl Operation {
    pub fn new(kind: OperationKind, amount: Money, date: NaiveDate) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        if amount > Money::MAX_AMOUNT {
            return Err(EngineError::InvalidAmount(format!(
                "amount must not exceed {}",
                Money::MAX_AMOUNT
            )));
        }
        Ok(Self { kind, amount, date })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "operations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub chat_id: i64,
    pub type_operation: String,
    /// Amount in base-currency minor units.
    pub sum: i64,
    pub date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ChatId",
        to = "super::users::Column::ChatId"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn new_for(chat_id: i64, operation: &Operation) -> Self {
        Self {
            id: ActiveValue::NotSet,
            chat_id: ActiveValue::Set(chat_id),
            type_operation: ActiveValue::Set(operation.kind.as_str().to_string()),
            sum: ActiveValue::Set(operation.amount.minor()),
            date: ActiveValue::Set(operation.date),
        }
    }
}

impl TryFrom<Model> for Operation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: OperationKind::try_from(model.type_operation.as_str())?,
            amount: Money::new(model.sum),
            date: model.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_storage_name() {
        for kind in [OperationKind::Income, OperationKind::Expense] {
            assert_eq!(OperationKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(OperationKind::try_from("refund").is_err());
    }

    #[test]
    fn new_rejects_non_positive_amount() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(Operation::new(OperationKind::Expense, Money::ZERO, date).is_err());
        assert!(Operation::new(OperationKind::Income, Money::new(-1), date).is_err());
        assert!(Operation::new(OperationKind::Income, Money::new(1), date).is_ok());
    }

    #[test]
    fn new_rejects_amount_above_cap() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(Operation::new(OperationKind::Income, Money::MAX_AMOUNT, date).is_ok());
        let above = Money::new(Money::MAX_AMOUNT.minor() + 1);
        assert!(matches!(
            Operation::new(OperationKind::Income, above, date),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn model_with_unknown_kind_is_rejected() {
        let model = Model {
            id: 1,
            chat_id: 7,
            type_operation: "transfer".to_string(),
            sum: 100,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert_eq!(
            Operation::try_from(model).unwrap_err(),
            EngineError::InvalidKind("transfer".to_string())
        );
    }
}
