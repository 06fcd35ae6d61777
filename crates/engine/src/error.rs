//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`DuplicateUser`] thrown when registering a chat that is already known.
//! - [`UnknownUser`] thrown when an operation references a chat that never
//!   registered (the foreign key of `operations.chat_id`).
//! - [`InvalidAmount`] thrown when an amount cannot be parsed, is not
//!   positive or exceeds the per-operation cap.
//! - [`DuplicateCurrency`] and [`MissingCurrency`] thrown by the exchange
//!   rate directory.
//! - [`Overflow`] thrown when report totals leave the `i64` range.
//!
//!  [`DuplicateUser`]: EngineError::DuplicateUser
//!  [`UnknownUser`]: EngineError::UnknownUser
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`DuplicateCurrency`]: EngineError::DuplicateCurrency
//!  [`MissingCurrency`]: EngineError::MissingCurrency
//!  [`Overflow`]: EngineError::Overflow
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("user {0} already registered")]
    DuplicateUser(i64),
    #[error("user {0} is not registered")]
    UnknownUser(i64),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid operation kind: {0}")]
    InvalidKind(String),
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid rate: {0}")]
    InvalidRate(String),
    #[error("currency {0} already exists")]
    DuplicateCurrency(String),
    #[error("currency {0} not found")]
    MissingCurrency(String),
    #[error("report totals overflow")]
    Overflow,
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Map a failed insert on behalf of `chat_id` to the constraint it broke.
    ///
    /// Anything that is not a unique or foreign key violation stays a
    /// [`EngineError::Database`].
    pub(crate) fn from_insert(chat_id: i64, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::DuplicateUser(chat_id),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::UnknownUser(chat_id),
            _ => Self::Database(err),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DuplicateUser(a), Self::DuplicateUser(b)) => a == b,
            (Self::UnknownUser(a), Self::UnknownUser(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidKind(a), Self::InvalidKind(b)) => a == b,
            (Self::UnsupportedCurrency(a), Self::UnsupportedCurrency(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidRate(a), Self::InvalidRate(b)) => a == b,
            (Self::DuplicateCurrency(a), Self::DuplicateCurrency(b)) => a == b,
            (Self::MissingCurrency(a), Self::MissingCurrency(b)) => a == b,
            (Self::Overflow, Self::Overflow) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
