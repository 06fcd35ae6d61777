use chrono::NaiveDate;
use engine::{Currency, Engine, EngineError, Period, Report};

use crate::rates::RateClient;

/// A report together with what the user asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ReportOutcome {
    pub requested: Currency,
    pub period: Period,
    pub report: Report,
}

impl ReportOutcome {
    /// `true` when the requested currency had no usable rate and the report
    /// was rendered in the base currency instead.
    pub(crate) fn fell_back(&self) -> bool {
        self.report.currency != self.requested
    }
}

pub(crate) async fn build_report(
    engine: &Engine,
    rates: &RateClient,
    chat_id: i64,
    currency: Currency,
    period: Period,
    today: NaiveDate,
) -> Result<ReportOutcome, EngineError> {
    let operations = engine
        .fetch_operations(chat_id, period.lower_bound(today))
        .await?;

    let (target, rate) = match rates.convert_rate(currency).await {
        Some(rate) => (currency, rate),
        None => (Currency::BASE, 1.0),
    };

    Ok(ReportOutcome {
        requested: currency,
        period,
        report: Report::build(&operations, target, rate)?,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use engine::{Money, OperationKind};
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};

    use super::*;
    use crate::rates::tests::{rate_service, silent_service};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    async fn engine_with_history() -> Engine {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build().await.unwrap();

        engine.register_user(7, "Ivan").await.unwrap();
        engine
            .insert_operation(7, OperationKind::Income, Money::new(905_000), today())
            .await
            .unwrap();
        engine
            .insert_operation(
                7,
                OperationKind::Expense,
                Money::new(181_000),
                NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            )
            .await
            .unwrap();
        engine
    }

    #[tokio::test]
    async fn converts_with_the_quoted_rate() {
        let engine = engine_with_history().await;
        let rates = RateClient::new(&rate_service().await, Duration::from_secs(3)).unwrap();

        let outcome = build_report(&engine, &rates, 7, Currency::Usd, Period::AllTime, today())
            .await
            .unwrap();

        assert!(!outcome.fell_back());
        assert_eq!(outcome.report.currency, Currency::Usd);
        assert_eq!(outcome.report.total_income, Money::new(10_000));
        assert_eq!(outcome.report.total_expense, Money::new(2_000));
        assert_eq!(outcome.report.balance(), Money::new(8_000));
    }

    #[tokio::test]
    async fn period_limits_the_history() {
        let engine = engine_with_history().await;
        let rates = RateClient::new(&rate_service().await, Duration::from_secs(3)).unwrap();

        let outcome = build_report(&engine, &rates, 7, Currency::Rub, Period::Week, today())
            .await
            .unwrap();

        assert_eq!(outcome.report.lines.len(), 1);
        assert_eq!(outcome.report.total_expense, Money::ZERO);
    }

    #[tokio::test]
    async fn unreachable_rate_service_falls_back_to_base() {
        let engine = engine_with_history().await;
        let rates = RateClient::new(&silent_service().await, Duration::from_millis(200)).unwrap();

        let outcome = build_report(&engine, &rates, 7, Currency::Eur, Period::AllTime, today())
            .await
            .unwrap();

        assert!(outcome.fell_back());
        assert_eq!(outcome.requested, Currency::Eur);
        assert_eq!(outcome.report.currency, Currency::Rub);
        assert_eq!(outcome.report.total_income, Money::new(905_000));
    }

    #[tokio::test]
    async fn user_without_operations_gets_empty_report() {
        let engine = engine_with_history().await;
        engine.register_user(8, "Olga").await.unwrap();
        let rates = RateClient::new("http://127.0.0.1:1", Duration::from_millis(100)).unwrap();

        let outcome = build_report(&engine, &rates, 8, Currency::Rub, Period::Today, today())
            .await
            .unwrap();

        assert!(outcome.report.is_empty());
        assert!(!outcome.fell_back());
    }

    #[tokio::test]
    async fn overflowing_history_is_an_error() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db.clone()).build().await.unwrap();
        engine.register_user(7, "Ivan").await.unwrap();
        for _ in 0..2 {
            db.execute(Statement::from_sql_and_values(
                db.get_database_backend(),
                "INSERT INTO operations (chat_id, type_operation, sum, date) VALUES (?, ?, ?, ?)",
                vec![7i64.into(), "income".into(), (i64::MAX - 10).into(), today().into()],
            ))
            .await
            .unwrap();
        }
        let rates = RateClient::new("http://127.0.0.1:1", Duration::from_millis(100)).unwrap();

        let err = build_report(&engine, &rates, 7, Currency::Rub, Period::AllTime, today())
            .await
            .unwrap_err();

        assert_eq!(err, EngineError::Overflow);
    }
}
