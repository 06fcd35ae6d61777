//! Telegram bot.
//!
//! Drives the registration, add-operation and report dialogues plus the
//! currency directory: listing, conversion into rubles and the admin-only
//! editor. Persistence goes through [`engine::Engine`]; report rates come
//! from the external rate service.

use std::time::Duration;

use engine::Engine;
use teloxide::{prelude::*, utils::command::BotCommands};

mod commands;
mod dialogue;
mod handlers;
mod parsing;
mod rates;
mod reports;
mod state;
mod ui;

pub use commands::Command;

const DEFAULT_RATE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct ConfigParameters {
    engine: Engine,
    rates: rates::RateClient,
    sessions: state::SessionStore,
}

pub struct Bot {
    token: String,
    engine: Engine,
    rates: rates::RateClient,
}

impl Bot {
    pub fn new(
        token: &str,
        engine: Engine,
        rate_service: &str,
        rate_timeout: Duration,
    ) -> Result<Self, String> {
        if token.trim().is_empty() {
            return Err("telegram token is empty".to_string());
        }
        let rates = rates::RateClient::new(rate_service, rate_timeout)?;

        Ok(Self {
            token: token.to_string(),
            engine,
            rates,
        })
    }

    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);
        if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
            tracing::warn!("failed to publish the command list: {err}");
        }

        let parameters = ConfigParameters {
            engine: self.engine.clone(),
            rates: self.rates.clone(),
            sessions: state::SessionStore::default(),
        };

        let handler =
            dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default, Debug)]
pub struct BotBuilder {
    token: String,
    engine: Option<Engine>,
    rate_service: String,
    rate_timeout: Option<Duration>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    pub fn engine(mut self, engine: Engine) -> BotBuilder {
        self.engine = Some(engine);
        self
    }

    /// Base URL of the rate service and the per-request timeout.
    pub fn rate_service(mut self, url: &str, timeout: Duration) -> BotBuilder {
        self.rate_service = url.to_string();
        self.rate_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        let engine = self
            .engine
            .ok_or_else(|| "telegram bot needs an engine".to_string())?;
        Bot::new(
            &self.token,
            engine,
            &self.rate_service,
            self.rate_timeout.unwrap_or(DEFAULT_RATE_TIMEOUT),
        )
    }
}
