//! Finance engine: the persistence gateway behind the chat bot.
//!
//! The engine keeps no state of its own besides the database handle. Every
//! call borrows a connection for the statements it runs and hands it back when
//! the returned future completes, on success and on error alike.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, SqlErr, sea_query::Expr,
};
use unicode_normalization::UnicodeNormalization;

pub use currency::Currency;
pub use error::EngineError;
pub use exchange::ExchangeRate;
pub use money::Money;
pub use operations::{Operation, OperationKind};
pub use report::{Period, Report, ReportLine};

pub mod admins;
mod currency;
mod error;
pub mod exchange;
mod money;
pub mod operations;
mod report;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;

#[derive(Clone, Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Verify that every table the gateway relies on is reachable.
    pub async fn check_schema(&self) -> ResultEngine<()> {
        users::Entity::find().one(&self.database).await?;
        operations::Entity::find().one(&self.database).await?;
        exchange::Entity::find().one(&self.database).await?;
        admins::Entity::find().one(&self.database).await?;
        Ok(())
    }

    /// Return `true` when `chat_id` has completed registration.
    pub async fn user_exists(&self, chat_id: i64) -> ResultEngine<bool> {
        let user = users::Entity::find_by_id(chat_id)
            .one(&self.database)
            .await?;
        Ok(user.is_some())
    }

    /// Register `chat_id` under `name`.
    ///
    /// The name is trimmed and NFC-normalised. Registering the same chat twice
    /// fails with [`EngineError::DuplicateUser`].
    pub async fn register_user(&self, chat_id: i64, name: &str) -> ResultEngine<()> {
        let name: String = name.trim().nfc().collect();
        if name.is_empty() {
            return Err(EngineError::InvalidName("name must not be empty".to_string()));
        }
        if self.user_exists(chat_id).await? {
            return Err(EngineError::DuplicateUser(chat_id));
        }

        users::ActiveModel {
            chat_id: ActiveValue::Set(chat_id),
            name: ActiveValue::Set(name),
        }
        .insert(&self.database)
        .await
        .map_err(|err| EngineError::from_insert(chat_id, err))?;

        tracing::info!("registered user {chat_id}");
        Ok(())
    }

    /// Store a new operation for `chat_id`.
    ///
    /// Fails with [`EngineError::UnknownUser`] when the chat never registered.
    pub async fn insert_operation(
        &self,
        chat_id: i64,
        kind: OperationKind,
        amount: Money,
        date: NaiveDate,
    ) -> ResultEngine<Operation> {
        let operation = Operation::new(kind, amount, date)?;
        if !self.user_exists(chat_id).await? {
            return Err(EngineError::UnknownUser(chat_id));
        }

        operations::ActiveModel::new_for(chat_id, &operation)
            .insert(&self.database)
            .await
            .map_err(|err| EngineError::from_insert(chat_id, err))?;

        tracing::debug!(
            "stored {} of {} for {chat_id} on {date}",
            kind.as_str(),
            amount
        );
        Ok(operation)
    }

    /// Operations of `chat_id`, newest first.
    ///
    /// With `since` only operations dated on or after it are returned; `None`
    /// returns the full history.
    pub async fn fetch_operations(
        &self,
        chat_id: i64,
        since: Option<NaiveDate>,
    ) -> ResultEngine<Vec<Operation>> {
        let mut query =
            operations::Entity::find().filter(operations::Column::ChatId.eq(chat_id));
        if let Some(since) = since {
            query = query.filter(operations::Column::Date.gte(since));
        }

        query
            .order_by_desc(operations::Column::Date)
            .order_by_desc(operations::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Operation::try_from)
            .collect()
    }

    /// Return `true` when `chat_id` may edit the exchange rate directory.
    pub async fn is_admin(&self, chat_id: i64) -> ResultEngine<bool> {
        let admin = admins::Entity::find_by_id(chat_id)
            .one(&self.database)
            .await?;
        Ok(admin.is_some())
    }

    /// Make `chat_id` an admin. Granting twice is a no-op.
    pub async fn grant_admin(&self, chat_id: i64) -> ResultEngine<()> {
        if self.is_admin(chat_id).await? {
            return Ok(());
        }
        admins::ActiveModel {
            chat_id: ActiveValue::Set(chat_id),
        }
        .insert(&self.database)
        .await?;
        tracing::info!("granted admin rights to {chat_id}");
        Ok(())
    }

    /// The whole exchange rate directory, ordered by currency name.
    pub async fn list_currencies(&self) -> ResultEngine<Vec<ExchangeRate>> {
        let rows = exchange::Entity::find()
            .order_by_asc(exchange::Column::CurrencyName)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(ExchangeRate::from).collect())
    }

    /// Look up one currency; the name is matched case-insensitively.
    pub async fn find_currency(&self, name: &str) -> ResultEngine<Option<ExchangeRate>> {
        let name = ExchangeRate::normalize_name(name)?;
        let row = exchange::Entity::find()
            .filter(exchange::Column::CurrencyName.eq(name))
            .one(&self.database)
            .await?;
        Ok(row.map(ExchangeRate::from))
    }

    /// Add a currency to the directory.
    ///
    /// Fails with [`EngineError::DuplicateCurrency`] when the name is taken.
    pub async fn add_currency(&self, name: &str, rate: f64) -> ResultEngine<ExchangeRate> {
        let name = ExchangeRate::normalize_name(name)?;
        let rate = ExchangeRate::check_rate(rate)?;
        if self.find_currency(&name).await?.is_some() {
            return Err(EngineError::DuplicateCurrency(name));
        }

        exchange::ActiveModel {
            id: ActiveValue::NotSet,
            currency_name: ActiveValue::Set(name.clone()),
            rate: ActiveValue::Set(rate),
        }
        .insert(&self.database)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                EngineError::DuplicateCurrency(name.clone())
            }
            _ => EngineError::Database(err),
        })?;

        tracing::info!("added currency {name} at {rate}");
        Ok(ExchangeRate { name, rate })
    }

    /// Remove a currency. Fails with [`EngineError::MissingCurrency`] when
    /// nothing was deleted.
    pub async fn delete_currency(&self, name: &str) -> ResultEngine<()> {
        let name = ExchangeRate::normalize_name(name)?;
        let result = exchange::Entity::delete_many()
            .filter(exchange::Column::CurrencyName.eq(name.as_str()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::MissingCurrency(name));
        }
        tracing::info!("deleted currency {name}");
        Ok(())
    }

    /// Replace the rate of an existing currency.
    pub async fn update_currency_rate(&self, name: &str, rate: f64) -> ResultEngine<()> {
        let name = ExchangeRate::normalize_name(name)?;
        let rate = ExchangeRate::check_rate(rate)?;
        let result = exchange::Entity::update_many()
            .col_expr(exchange::Column::Rate, Expr::value(rate))
            .filter(exchange::Column::CurrencyName.eq(name.as_str()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::MissingCurrency(name));
        }
        tracing::info!("currency {name} now at {rate}");
        Ok(())
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`, refusing to start against a broken schema.
    pub async fn build(self) -> ResultEngine<Engine> {
        let engine = Engine {
            database: self.database,
        };
        engine.check_schema().await?;
        Ok(engine)
    }
}
