//! Validation of the free-text answers a dialogue collects.
//!
//! Every parser is total: malformed input becomes a [`ParseError`] whose
//! message is sent back to the user as a re-prompt.

use chrono::NaiveDate;
use engine::{Currency, EngineError, ExchangeRate, Money, OperationKind, Period};

use crate::ui::labels;

const DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ParseError {
    #[error("Please choose the operation type using the buttons.")]
    UnknownKind,
    #[error("⚠️ Please enter a valid amount (for example: 1500.50).")]
    InvalidAmount,
    #[error("⚠️ The amount must be greater than zero. Try again.")]
    NonPositiveAmount,
    #[error("⚠️ The amount is too large. The limit is 10000000000.00 per operation.")]
    AmountTooLarge,
    #[error("⚠️ Invalid date. Use DD.MM.YYYY or the 'Today' button.")]
    InvalidDate,
    #[error("Please choose a currency from the options below.")]
    UnknownCurrency,
    #[error("Please choose a period from the options below.")]
    UnknownPeriod,
    #[error("The name can't be empty. Please enter your name:")]
    EmptyName,
    #[error("⚠️ Please enter a currency code such as USD.")]
    InvalidCurrencyName,
    #[error("🚫 Please enter a number, for example 90.5.")]
    InvalidRate,
    #[error("❌ The rate must be greater than zero.")]
    NonPositiveRate,
    #[error("Please choose an action using the buttons.")]
    UnknownManageChoice,
}

/// Directory edits offered by the currency management menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ManageChoice {
    Add,
    Delete,
    Update,
}

fn matches_label(input: &str, label: &str) -> bool {
    input.trim().eq_ignore_ascii_case(label)
}

/// `true` when the input aborts the current dialogue.
pub(crate) fn is_cancel(input: &str) -> bool {
    matches_label(input, labels::CANCEL) || matches_label(input, "/cancel")
}

pub(crate) fn parse_name(input: &str) -> Result<String, ParseError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName);
    }
    Ok(name.to_string())
}

pub(crate) fn parse_kind(input: &str) -> Result<OperationKind, ParseError> {
    if matches_label(input, labels::INCOME) {
        Ok(OperationKind::Income)
    } else if matches_label(input, labels::EXPENSE) {
        Ok(OperationKind::Expense)
    } else {
        Err(ParseError::UnknownKind)
    }
}

/// Parses a positive amount up to [`Money::MAX_AMOUNT`], accepting `.` or `,`
/// as decimal separator.
pub(crate) fn parse_amount(input: &str) -> Result<Money, ParseError> {
    let amount: Money = input.parse().map_err(|_: EngineError| ParseError::InvalidAmount)?;
    if !amount.is_positive() {
        return Err(ParseError::NonPositiveAmount);
    }
    if amount > Money::MAX_AMOUNT {
        return Err(ParseError::AmountTooLarge);
    }
    Ok(amount)
}

/// Parses `DD.MM.YYYY` or the "today" shortcut.
pub(crate) fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ParseError> {
    if matches_label(input, labels::TODAY) {
        return Ok(today);
    }
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| ParseError::InvalidDate)
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_currency(input: &str) -> Result<Currency, ParseError> {
    Currency::ALL
        .into_iter()
        .find(|c| matches_label(input, c.code()))
        .ok_or(ParseError::UnknownCurrency)
}

pub(crate) fn parse_period(input: &str) -> Result<Period, ParseError> {
    Period::ALL
        .into_iter()
        .find(|p| matches_label(input, labels::period(*p)))
        .ok_or(ParseError::UnknownPeriod)
}

pub(crate) fn parse_currency_name(input: &str) -> Result<String, ParseError> {
    ExchangeRate::normalize_name(input).map_err(|_| ParseError::InvalidCurrencyName)
}

/// Parses a rate in base units, accepting `.` or `,` as decimal separator.
pub(crate) fn parse_rate(input: &str) -> Result<f64, ParseError> {
    let rate: f64 = input
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| ParseError::InvalidRate)?;
    if !rate.is_finite() {
        return Err(ParseError::InvalidRate);
    }
    if rate <= 0.0 {
        return Err(ParseError::NonPositiveRate);
    }
    Ok(rate)
}

pub(crate) fn parse_manage_choice(input: &str) -> Result<ManageChoice, ParseError> {
    if matches_label(input, labels::ADD_CURRENCY) {
        Ok(ManageChoice::Add)
    } else if matches_label(input, labels::DELETE_CURRENCY) {
        Ok(ManageChoice::Delete)
    } else if matches_label(input, labels::UPDATE_RATE) {
        Ok(ManageChoice::Update)
    } else {
        Err(ParseError::UnknownManageChoice)
    }
}
