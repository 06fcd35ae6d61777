//! Handles settings for the application.
//!
//! Configuration is read from `config/settings.toml` (optional) and from
//! `FINBOT__SECTION__KEY` environment variables. The plain variable names of
//! the original deployment (`TELEGRAM_BOT_TOKEN`, `DB_HOST`, ...) override
//! both.
use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
    pub host: String,
    #[serde(default = "default_postgres_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub name: String,
}

fn default_postgres_port() -> u16 {
    5432
}

/// Storage backend. Postgres wins over sqlite; with neither configured the
/// application runs on an in-memory database.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Database {
    pub sqlite: Option<String>,
    pub postgres: Option<Postgres>,
    pub migrate: bool,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            sqlite: None,
            postgres: None,
            migrate: true,
        }
    }
}

impl Database {
    pub fn url(&self) -> String {
        match (&self.postgres, &self.sqlite) {
            (Some(pg), _) => format!(
                "postgres://{}:{}@{}:{}/{}",
                pg.user, pg.password, pg.host, pg.port, pg.name
            ),
            (None, Some(path)) => format!("sqlite:{path}?mode=rwc"),
            (None, None) => String::from("sqlite::memory:"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    #[serde(default = "default_rate_service_url")]
    pub rate_service_url: String,
    #[serde(default = "default_rate_timeout")]
    pub rate_timeout_secs: u64,
    /// Chats granted the right to edit the exchange rate directory at startup.
    #[serde(default)]
    pub admins: Vec<i64>,
}

fn default_rate_service_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_rate_timeout() -> u64 {
    3
}

#[derive(Debug, Deserialize)]
pub struct Listen {
    pub bind: Option<String>,
    pub port: u16,
}

impl Listen {
    pub fn addr(&self) -> String {
        let bind = self.bind.as_deref().unwrap_or("127.0.0.1");
        format!("{bind}:{}", self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub database: Database,
    pub telegram: Option<Telegram>,
    pub rate_service: Option<Listen>,
    pub number_service: Option<Listen>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_PATH).required(false))
            .add_source(
                Environment::with_prefix("FINBOT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("telegram.token", env::var("TELEGRAM_BOT_TOKEN").ok())?
            .set_override_option(
                "telegram.rate_service_url",
                env::var("CURRENCY_SERVICE_URL").ok(),
            )?
            .set_override_option("database.postgres.host", env::var("DB_HOST").ok())?
            .set_override_option("database.postgres.port", env::var("DB_PORT").ok())?
            .set_override_option("database.postgres.user", env::var("DB_USER").ok())?
            .set_override_option("database.postgres.password", env::var("DB_PASSWORD").ok())?
            .set_override_option("database.postgres.name", env::var("DB_NAME").ok())?
            .build()?;

        settings.try_deserialize()
    }
}
