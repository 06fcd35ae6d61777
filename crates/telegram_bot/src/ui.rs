use engine::{Currency, ExchangeRate, Money, OperationKind, Period};
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

use crate::{
    parsing::format_date,
    reports::ReportOutcome,
    state::{Draft, Flow, Session},
};

pub(crate) mod labels {
    use engine::Period;

    pub(crate) const ADD_OPERATION: &str = "➕ Add operation";
    pub(crate) const REPORTS: &str = "📊 Reports";
    pub(crate) const HELP: &str = "ℹ️ Help";

    pub(crate) const INCOME: &str = "Income";
    pub(crate) const EXPENSE: &str = "Expense";
    pub(crate) const TODAY: &str = "Today";
    pub(crate) const CANCEL: &str = "Cancel";

    pub(crate) const ADD_CURRENCY: &str = "Add currency";
    pub(crate) const DELETE_CURRENCY: &str = "Delete currency";
    pub(crate) const UPDATE_RATE: &str = "Update rate";

    pub(crate) fn period(period: Period) -> &'static str {
        match period {
            Period::Today => "Today",
            Period::Week => "Week",
            Period::Month => "Month",
            Period::AllTime => "All time",
        }
    }
}

/// Main menu entries, matched against the exact button text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MenuButton {
    AddOperation,
    Reports,
    Help,
}

impl MenuButton {
    pub(crate) fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            labels::ADD_OPERATION => Some(Self::AddOperation),
            labels::REPORTS => Some(Self::Reports),
            labels::HELP => Some(Self::Help),
            _ => None,
        }
    }
}

fn keyboard<'a>(rows: impl IntoIterator<Item = Vec<&'a str>>) -> ReplyMarkup {
    let rows: Vec<Vec<KeyboardButton>> = rows
        .into_iter()
        .map(|row| row.into_iter().map(KeyboardButton::new).collect())
        .collect();
    ReplyMarkup::Keyboard(KeyboardMarkup::new(rows).resize_keyboard())
}

pub(crate) fn main_menu() -> ReplyMarkup {
    keyboard([
        vec![labels::ADD_OPERATION, labels::REPORTS],
        vec![labels::HELP],
    ])
}

pub(crate) fn no_keyboard() -> ReplyMarkup {
    ReplyMarkup::KeyboardRemove(KeyboardRemove::new())
}

fn cancel_only() -> ReplyMarkup {
    keyboard([vec![labels::CANCEL]])
}

/// Prompt text and keyboard shown on entering `session`.
pub(crate) fn prompt(session: &Session) -> (String, ReplyMarkup) {
    let (text, markup) = match session {
        Session::AwaitingName => ("Please enter your name:", cancel_only()),
        Session::AwaitingType => (
            "Choose the operation type:",
            keyboard([vec![labels::INCOME, labels::EXPENSE], vec![labels::CANCEL]]),
        ),
        Session::AwaitingAmount { .. } => {
            ("Enter the amount (for example: 1500.50):", cancel_only())
        }
        Session::AwaitingDate { .. } => (
            "Enter the date as DD.MM.YYYY or press 'Today':",
            keyboard([vec![labels::TODAY], vec![labels::CANCEL]]),
        ),
        Session::AwaitingCurrency => {
            let codes: Vec<&str> = Currency::ALL.iter().map(|c| c.code()).collect();
            (
                "Choose the report currency:",
                keyboard([codes, vec![labels::CANCEL]]),
            )
        }
        Session::AwaitingPeriod { .. } => {
            let periods: Vec<&str> = Period::ALL.iter().map(|p| labels::period(*p)).collect();
            (
                "Choose the report period:",
                keyboard([periods, vec![labels::CANCEL]]),
            )
        }
        Session::AwaitingConvertCurrency => (
            "Enter the currency name (for example: USD, EUR):",
            cancel_only(),
        ),
        Session::AwaitingConvertAmount { currency } => {
            return (
                format!("Enter the amount in {currency} to convert into rubles:"),
                cancel_only(),
            );
        }
        Session::AwaitingManageChoice => (
            "Currency management:",
            keyboard([
                vec![labels::ADD_CURRENCY, labels::DELETE_CURRENCY, labels::UPDATE_RATE],
                vec![labels::CANCEL],
            ]),
        ),
        Session::AwaitingNewCurrencyName => ("Enter the currency name:", cancel_only()),
        Session::AwaitingNewCurrencyRate { name } => {
            return (format!("Enter the {name} rate in rubles:"), cancel_only());
        }
        Session::AwaitingCurrencyToDelete => {
            ("Enter the name of the currency to delete:", cancel_only())
        }
        Session::AwaitingCurrencyToUpdate => {
            ("Enter the name of the currency to update:", cancel_only())
        }
        Session::AwaitingUpdatedRate { name } => {
            return (format!("Enter the new {name} rate in rubles:"), cancel_only());
        }
    };
    (text.to_string(), markup)
}

/// One button per directory entry, then Cancel.
pub(crate) fn currency_keyboard(currencies: &[ExchangeRate]) -> ReplyMarkup {
    let names: Vec<&str> = currencies.iter().map(|c| c.name.as_str()).collect();
    keyboard([names, vec![labels::CANCEL]])
}

fn currency_names(currencies: &[ExchangeRate]) -> String {
    currencies
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn available_currencies_text(currencies: &[ExchangeRate]) -> String {
    format!("Available currencies: {}", currency_names(currencies))
}

pub(crate) fn currencies_text(currencies: &[ExchangeRate]) -> String {
    if currencies.is_empty() {
        return "ℹ️ No currencies saved yet.".to_string();
    }
    let mut out = String::from("📊 Current exchange rates:");
    for currency in currencies {
        out.push_str(&format!("\n• {}: {} RUB", currency.name, currency.rate));
    }
    out
}

pub(crate) fn nothing_to_convert_text() -> &'static str {
    "ℹ️ No currencies available for conversion."
}

pub(crate) fn currency_not_found_text(name: &str, currencies: &[ExchangeRate]) -> String {
    format!(
        "❌ Currency '{name}' not found.\n{}",
        available_currencies_text(currencies)
    )
}

pub(crate) fn conversion_text(currency: &ExchangeRate, amount: Money) -> String {
    format!(
        "💱 Conversion result:\n{amount} {name} = {converted}\nRate: 1 {name} = {rate} RUB",
        name = currency.name,
        converted = currency.to_base(amount).format(Currency::BASE),
        rate = currency.rate
    )
}

pub(crate) fn no_access_text() -> &'static str {
    "You don't have access to this command."
}

pub(crate) fn currency_added_text(name: &str) -> String {
    format!("✅ Currency {name} added.")
}

pub(crate) fn currency_exists_text(name: &str) -> String {
    format!("❌ Currency {name} already exists.")
}

pub(crate) fn currency_deleted_text(name: &str) -> String {
    format!("✅ Currency {name} deleted.")
}

pub(crate) fn rate_updated_text(name: &str) -> String {
    format!("✅ The {name} rate was updated.")
}

pub(crate) fn currency_missing_text(name: &str) -> String {
    format!("❌ Currency {name} not found.")
}

pub(crate) fn cancelled_text(flow: Flow) -> &'static str {
    match flow {
        Flow::Registration => "Registration cancelled.",
        Flow::AddOperation => "Adding the operation was cancelled.",
        Flow::Report => "Report cancelled.",
        Flow::Convert => "Conversion cancelled.",
        Flow::ManageCurrencies => "Currency management cancelled.",
    }
}

pub(crate) fn welcome_text(name: Option<&str>, registered: bool) -> String {
    let greeting = match name {
        Some(name) => format!("Hello, {name}! 👋"),
        None => "Hello! 👋".to_string(),
    };
    if registered {
        format!("{greeting}\nI keep track of your income and expenses. Choose an action below.")
    } else {
        format!("{greeting}\nI keep track of your income and expenses. Use /register to get started.")
    }
}

pub(crate) fn help_text() -> &'static str {
    "Available actions:\n\
     /register - create your account\n\
     ➕ Add operation - record an income or an expense\n\
     📊 Reports - show your operations for a period\n\
     /get_currencies - list the exchange rates\n\
     /convert - convert an amount into rubles\n\
     /manage_currency - edit the exchange rates (admins only)\n\
     /cancel - abort the current action"
}

pub(crate) fn unknown_text() -> &'static str {
    "I don't understand. Please use the menu buttons."
}

pub(crate) fn already_registered_text() -> &'static str {
    "You are already registered."
}

pub(crate) fn not_registered_text() -> &'static str {
    "You are not registered yet. Use /register first."
}

pub(crate) fn registered_text(name: &str) -> String {
    format!("Registration complete. Welcome, {name}!")
}

pub(crate) fn try_later_text() -> &'static str {
    "Something went wrong. Please try again later."
}

fn kind_label(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Income => labels::INCOME,
        OperationKind::Expense => labels::EXPENSE,
    }
}

fn kind_marker(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Income => "⬆️",
        OperationKind::Expense => "⬇️",
    }
}

pub(crate) fn saved_text(draft: &Draft) -> String {
    format!(
        "✅ Operation saved.\nType: {}\nAmount: {}\nDate: {}",
        kind_label(draft.kind),
        draft.amount.format(Currency::BASE),
        format_date(draft.date)
    )
}

pub(crate) fn render_report(outcome: &ReportOutcome) -> String {
    let report = &outcome.report;
    let mut out = String::new();

    if outcome.fell_back() {
        out.push_str(&format!(
            "⚠️ The {} rate is unavailable right now, amounts are shown in {}.\n\n",
            outcome.requested,
            report.currency
        ));
    }

    if report.is_empty() {
        out.push_str("No operations for the selected period.");
        return out;
    }

    out.push_str(&format!(
        "Report ({}) in {}:\n",
        labels::period(outcome.period).to_lowercase(),
        report.currency
    ));
    for line in &report.lines {
        out.push_str(&format!(
            "{} {} {}\n",
            kind_marker(line.kind),
            format_date(line.date),
            line.amount.format(report.currency)
        ));
    }
    out.push_str(&format!(
        "\nTotal income: {}\nTotal expense: {}\nBalance: {}",
        report.total_income.format(report.currency),
        report.total_expense.format(report.currency),
        report.balance().format(report.currency)
    ));
    out
}
