//! Period reports.
//!
//! A report is built from operations already filtered by [`Period`] and
//! converted into the requested currency with a single exchange rate.

use chrono::{Days, NaiveDate};
use crate::{Currency, EngineError, Money, Operation, OperationKind, ResultEngine};

/// Reporting window, anchored on the current date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Period {
    Today,
    Week,
    Month,
    AllTime,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Today, Period::Week, Period::Month, Period::AllTime];

    /// Inclusive lower bound on the operation date, `None` for the whole history.
    ///
    /// Week and month cover the last 7 and 30 calendar days including `today`.
    #[must_use]
    pub fn lower_bound(self, today: NaiveDate) -> Option<NaiveDate> {
        let span = match self {
            Period::Today => 1,
            Period::Week => 7,
            Period::Month => 30,
            Period::AllTime => return None,
        };
        Some(
            today
                .checked_sub_days(Days::new(span - 1))
                .unwrap_or(NaiveDate::MIN),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportLine {
    pub kind: OperationKind,
    pub date: NaiveDate,
    /// Amount converted into the report currency.
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub currency: Currency,
    pub lines: Vec<ReportLine>,
    pub total_income: Money,
    pub total_expense: Money,
}

impl Report {
    /// Builds a report over `operations`, preserving their order.
    ///
    /// Each stored amount is divided by `rate` (base units per unit of
    /// `currency`); totals accumulate the converted amounts and fail with
    /// [`EngineError::Overflow`] instead of wrapping.
    pub fn build(operations: &[Operation], currency: Currency, rate: f64) -> ResultEngine<Self> {
        let mut total_income = Money::ZERO;
        let mut total_expense = Money::ZERO;
        let mut lines = Vec::with_capacity(operations.len());

        for op in operations {
            let amount = op.amount.convert(rate);
            let total = match op.kind {
                OperationKind::Income => &mut total_income,
                OperationKind::Expense => &mut total_expense,
            };
            *total = total.checked_add(amount).ok_or(EngineError::Overflow)?;
            lines.push(ReportLine {
                kind: op.kind,
                date: op.date,
                amount,
            });
        }

        Ok(Self {
            currency,
            lines,
            total_income,
            total_expense,
        })
    }

    /// Both totals are non-negative, so the difference always fits.
    #[must_use]
    pub fn balance(&self) -> Money {
        self.total_income - self.total_expense
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn lower_bounds_are_inclusive_day_counts() {
        let today = date(2024, 3, 31);
        assert_eq!(Period::Today.lower_bound(today), Some(today));
        assert_eq!(Period::Week.lower_bound(today), Some(date(2024, 3, 25)));
        assert_eq!(Period::Month.lower_bound(today), Some(date(2024, 3, 2)));
        assert_eq!(Period::AllTime.lower_bound(today), None);
    }

    #[test]
    fn totals_and_balance() {
        let ops = [
            Operation::new(OperationKind::Income, Money::new(500_000), date(2024, 3, 3)).unwrap(),
            Operation::new(OperationKind::Expense, Money::new(150_050), date(2024, 3, 2)).unwrap(),
            Operation::new(OperationKind::Expense, Money::new(49_950), date(2024, 3, 1)).unwrap(),
        ];
        let report = Report::build(&ops, Currency::Rub, 1.0).unwrap();
        assert_eq!(report.lines.len(), 3);
        assert_eq!(report.total_income, Money::new(500_000));
        assert_eq!(report.total_expense, Money::new(200_000));
        assert_eq!(report.balance(), Money::new(300_000));
        assert_eq!(report.lines[0].date, date(2024, 3, 3));
    }

    #[test]
    fn base_currency_report_keeps_stored_amounts() {
        let ops = [
            Operation::new(OperationKind::Expense, Money::new(1), date(2024, 1, 1)).unwrap(),
            Operation::new(OperationKind::Income, Money::new(123_456_789), date(2024, 1, 1))
                .unwrap(),
        ];
        let report = Report::build(&ops, Currency::BASE, 1.0).unwrap();
        for (line, op) in report.lines.iter().zip(ops.iter()) {
            assert_eq!(line.amount, op.amount);
        }
    }

    #[test]
    fn foreign_currency_divides_by_rate() {
        let ops = [Operation::new(OperationKind::Income, Money::new(987_000), date(2024, 1, 1))
            .unwrap()];
        let report = Report::build(&ops, Currency::Eur, 98.7).unwrap();
        assert_eq!(report.lines[0].amount, Money::new(10_000));
        assert_eq!(report.balance(), Money::new(10_000));
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        // Rows read back from storage skip the per-operation cap.
        let huge = Operation {
            kind: OperationKind::Income,
            amount: Money::new(i64::MAX - 10),
            date: date(2024, 1, 1),
        };
        let ops = [huge, huge];
        assert_eq!(
            Report::build(&ops, Currency::Rub, 1.0),
            Err(EngineError::Overflow)
        );
    }
}
