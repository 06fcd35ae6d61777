//! Pure transition function of the dialogue state machine.
//!
//! [`advance`] never touches the network, the database or the session store;
//! handlers apply the returned [`Step`].

use chrono::NaiveDate;
use engine::{Currency, Money, Period};

use crate::{
    parsing::{self, ManageChoice, ParseError},
    state::{Draft, Flow, Session},
};

/// Work to perform once a dialogue has collected what it needs.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Action {
    Register { name: String },
    SaveOperation(Draft),
    Report { currency: Currency, period: Period },
    /// Look the currency up before asking for the amount.
    SelectConvertCurrency { name: String },
    Convert { currency: String, amount: Money },
    AddCurrency { name: String, rate: f64 },
    DeleteCurrency { name: String },
    UpdateCurrencyRate { name: String, rate: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Step {
    /// The answer was rejected; the session is unchanged.
    Stay(ParseError),
    /// The answer was accepted and the dialogue moves on.
    Next(Session),
    /// The user aborted the dialogue.
    Cancelled(Flow),
    /// The answers are complete; the handler performing the action decides
    /// the next session.
    Done(Action),
}

pub(crate) fn advance(session: &Session, input: &str, today: NaiveDate) -> Step {
    if parsing::is_cancel(input) {
        return Step::Cancelled(session.flow());
    }

    match session {
        Session::AwaitingName => match parsing::parse_name(input) {
            Ok(name) => Step::Done(Action::Register { name }),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingType => match parsing::parse_kind(input) {
            Ok(kind) => Step::Next(Session::AwaitingAmount { kind }),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingAmount { kind } => match parsing::parse_amount(input) {
            Ok(amount) => Step::Next(Session::AwaitingDate {
                kind: *kind,
                amount,
            }),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingDate { kind, amount } => match parsing::parse_date(input, today) {
            Ok(date) => Step::Done(Action::SaveOperation(Draft {
                kind: *kind,
                amount: *amount,
                date,
            })),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingCurrency => match parsing::parse_currency(input) {
            Ok(currency) => Step::Next(Session::AwaitingPeriod { currency }),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingPeriod { currency } => match parsing::parse_period(input) {
            Ok(period) => Step::Done(Action::Report {
                currency: *currency,
                period,
            }),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingConvertCurrency => match parsing::parse_currency_name(input) {
            Ok(name) => Step::Done(Action::SelectConvertCurrency { name }),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingConvertAmount { currency } => match parsing::parse_amount(input) {
            Ok(amount) => Step::Done(Action::Convert {
                currency: currency.clone(),
                amount,
            }),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingManageChoice => match parsing::parse_manage_choice(input) {
            Ok(ManageChoice::Add) => Step::Next(Session::AwaitingNewCurrencyName),
            Ok(ManageChoice::Delete) => Step::Next(Session::AwaitingCurrencyToDelete),
            Ok(ManageChoice::Update) => Step::Next(Session::AwaitingCurrencyToUpdate),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingNewCurrencyName => match parsing::parse_currency_name(input) {
            Ok(name) => Step::Next(Session::AwaitingNewCurrencyRate { name }),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingNewCurrencyRate { name } => match parsing::parse_rate(input) {
            Ok(rate) => Step::Done(Action::AddCurrency {
                name: name.clone(),
                rate,
            }),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingCurrencyToDelete => match parsing::parse_currency_name(input) {
            Ok(name) => Step::Done(Action::DeleteCurrency { name }),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingCurrencyToUpdate => match parsing::parse_currency_name(input) {
            Ok(name) => Step::Next(Session::AwaitingUpdatedRate { name }),
            Err(err) => Step::Stay(err),
        },
        Session::AwaitingUpdatedRate { name } => match parsing::parse_rate(input) {
            Ok(rate) => Step::Done(Action::UpdateCurrencyRate {
                name: name.clone(),
                rate,
            }),
            Err(err) => Step::Stay(err),
        },
    }
}
