use chrono::{NaiveDate, Utc};
use chrono_tz::Europe::Moscow;
use engine::EngineError;
use teloxide::{prelude::*, types::ReplyMarkup};

use crate::{
    ConfigParameters,
    commands::{Command, parse_command},
    dialogue::{Action, Step, advance},
    parsing::ParseError,
    reports::build_report,
    state::{Draft, Flow, Session},
    ui::{self, MenuButton},
};

/// Current date in the bot's time zone.
pub(crate) fn today() -> NaiveDate {
    Utc::now().with_timezone(&Moscow).date_naive()
}

/// What a chat sent, already split into command or free text.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Input<'a> {
    Command {
        cmd: Command,
        first_name: Option<&'a str>,
    },
    Text(&'a str),
}

/// The message to send back.
#[derive(Clone, Debug)]
pub(crate) struct Reply {
    pub text: String,
    pub markup: ReplyMarkup,
}

impl Reply {
    fn new(text: impl Into<String>, markup: ReplyMarkup) -> Self {
        Self {
            text: text.into(),
            markup,
        }
    }
}

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let input = match parse_command(text) {
        Some(cmd) => Input::Command {
            cmd,
            first_name: msg.from.as_ref().map(|user| user.first_name.as_str()),
        },
        None => Input::Text(text),
    };

    let reply = respond(&cfg, chat_id, input, today()).await;
    bot.send_message(chat_id, reply.text)
        .reply_markup(reply.markup)
        .await?;
    Ok(())
}

/// Applies `input` to the chat's session and the database and returns the
/// answer. Never fails: storage errors become a "try again later" reply.
pub(crate) async fn respond(
    cfg: &ConfigParameters,
    chat_id: ChatId,
    input: Input<'_>,
    today: NaiveDate,
) -> Reply {
    let text = match input {
        Input::Command { cmd, first_name } => {
            return handle_command(cfg, chat_id, cmd, first_name).await;
        }
        Input::Text(text) => text,
    };

    if let Some(session) = cfg.sessions.get(chat_id).await {
        return continue_dialogue(cfg, chat_id, &session, text, today).await;
    }

    match MenuButton::parse(text) {
        Some(MenuButton::AddOperation) => start_flow(cfg, chat_id, Flow::AddOperation).await,
        Some(MenuButton::Reports) => start_flow(cfg, chat_id, Flow::Report).await,
        Some(MenuButton::Help) => Reply::new(ui::help_text(), ui::main_menu()),
        None => Reply::new(ui::unknown_text(), ui::main_menu()),
    }
}

async fn handle_command(
    cfg: &ConfigParameters,
    chat_id: ChatId,
    cmd: Command,
    first_name: Option<&str>,
) -> Reply {
    match cmd {
        Command::Start => {
            cfg.sessions.clear(chat_id).await;
            let registered = match cfg.engine.user_exists(chat_id.0).await {
                Ok(registered) => registered,
                Err(err) => return persistence_failure(cfg, chat_id, err).await,
            };
            let markup = if registered {
                ui::main_menu()
            } else {
                ui::no_keyboard()
            };
            Reply::new(ui::welcome_text(first_name, registered), markup)
        }
        Command::Register => start_flow(cfg, chat_id, Flow::Registration).await,
        Command::Help => Reply::new(ui::help_text(), ui::main_menu()),
        Command::Cancel => match cfg.sessions.get(chat_id).await {
            Some(session) => {
                cfg.sessions.clear(chat_id).await;
                Reply::new(ui::cancelled_text(session.flow()), ui::main_menu())
            }
            None => Reply::new("Nothing to cancel.", ui::main_menu()),
        },
        Command::GetCurrencies => match cfg.engine.list_currencies().await {
            Ok(currencies) => Reply::new(ui::currencies_text(&currencies), ui::main_menu()),
            Err(err) => persistence_failure(cfg, chat_id, err).await,
        },
        Command::Convert => start_flow(cfg, chat_id, Flow::Convert).await,
        Command::ManageCurrency => start_flow(cfg, chat_id, Flow::ManageCurrencies).await,
    }
}

/// Opens `flow` at its first step once the chat may enter it.
async fn start_flow(cfg: &ConfigParameters, chat_id: ChatId, flow: Flow) -> Reply {
    match flow {
        Flow::Registration | Flow::AddOperation | Flow::Report => {
            let registered = match cfg.engine.user_exists(chat_id.0).await {
                Ok(registered) => registered,
                Err(err) => return persistence_failure(cfg, chat_id, err).await,
            };
            if flow == Flow::Registration && registered {
                cfg.sessions.clear(chat_id).await;
                return Reply::new(ui::already_registered_text(), ui::main_menu());
            }
            if flow.needs_registration() && !registered {
                cfg.sessions.clear(chat_id).await;
                return Reply::new(ui::not_registered_text(), ui::no_keyboard());
            }
        }
        Flow::Convert => {
            let currencies = match cfg.engine.list_currencies().await {
                Ok(currencies) => currencies,
                Err(err) => return persistence_failure(cfg, chat_id, err).await,
            };
            cfg.sessions.clear(chat_id).await;
            if currencies.is_empty() {
                return Reply::new(ui::nothing_to_convert_text(), ui::main_menu());
            }
            let session = flow.initial();
            let (prompt, _) = ui::prompt(&session);
            cfg.sessions.set(chat_id, session).await;
            return Reply::new(
                format!("{prompt}\n{}", ui::available_currencies_text(&currencies)),
                ui::currency_keyboard(&currencies),
            );
        }
        Flow::ManageCurrencies => match cfg.engine.is_admin(chat_id.0).await {
            Ok(true) => {}
            Ok(false) => {
                cfg.sessions.clear(chat_id).await;
                return Reply::new(ui::no_access_text(), ui::main_menu());
            }
            Err(err) => return persistence_failure(cfg, chat_id, err).await,
        },
    }

    let session = flow.initial();
    let (text, markup) = ui::prompt(&session);
    cfg.sessions.set(chat_id, session).await;
    Reply::new(text, markup)
}

async fn continue_dialogue(
    cfg: &ConfigParameters,
    chat_id: ChatId,
    session: &Session,
    text: &str,
    today: NaiveDate,
) -> Reply {
    let step = advance(session, text, today);
    tracing::debug!("chat {chat_id}: {session:?} -> {step:?}");

    match step {
        Step::Stay(err) => {
            let (_, markup) = ui::prompt(session);
            Reply::new(err.to_string(), markup)
        }
        Step::Next(next) => {
            let (prompt, markup) = ui::prompt(&next);
            cfg.sessions.set(chat_id, next).await;
            Reply::new(prompt, markup)
        }
        Step::Cancelled(flow) => {
            cfg.sessions.clear(chat_id).await;
            Reply::new(ui::cancelled_text(flow), ui::main_menu())
        }
        Step::Done(action) => perform(cfg, chat_id, session, action, today).await,
    }
}

async fn perform(
    cfg: &ConfigParameters,
    chat_id: ChatId,
    session: &Session,
    action: Action,
    today: NaiveDate,
) -> Reply {
    match action {
        Action::Register { name } => match cfg.engine.register_user(chat_id.0, &name).await {
            Ok(()) => {
                cfg.sessions.clear(chat_id).await;
                Reply::new(ui::registered_text(&name), ui::main_menu())
            }
            Err(EngineError::DuplicateUser(_)) => {
                cfg.sessions.clear(chat_id).await;
                Reply::new(ui::already_registered_text(), ui::main_menu())
            }
            Err(EngineError::InvalidName(_)) => {
                let (_, markup) = ui::prompt(session);
                Reply::new(ParseError::EmptyName.to_string(), markup)
            }
            Err(err) => persistence_failure(cfg, chat_id, err).await,
        },
        Action::SaveOperation(draft) => save_operation(cfg, chat_id, draft).await,
        Action::Report { currency, period } => {
            let outcome =
                build_report(&cfg.engine, &cfg.rates, chat_id.0, currency, period, today).await;
            match outcome {
                Ok(outcome) => {
                    cfg.sessions.clear(chat_id).await;
                    Reply::new(ui::render_report(&outcome), ui::main_menu())
                }
                Err(err) => persistence_failure(cfg, chat_id, err).await,
            }
        }
        Action::SelectConvertCurrency { name } => select_convert_currency(cfg, chat_id, name).await,
        Action::Convert { currency, amount } => {
            let found = match cfg.engine.find_currency(&currency).await {
                Ok(found) => found,
                Err(err) => return persistence_failure(cfg, chat_id, err).await,
            };
            cfg.sessions.clear(chat_id).await;
            match found {
                Some(rate) => Reply::new(ui::conversion_text(&rate, amount), ui::main_menu()),
                None => Reply::new(ui::currency_missing_text(&currency), ui::main_menu()),
            }
        }
        Action::AddCurrency { name, rate } => match cfg.engine.add_currency(&name, rate).await {
            Ok(_) => {
                cfg.sessions.clear(chat_id).await;
                Reply::new(ui::currency_added_text(&name), ui::main_menu())
            }
            Err(EngineError::DuplicateCurrency(_)) => {
                cfg.sessions.clear(chat_id).await;
                Reply::new(ui::currency_exists_text(&name), ui::main_menu())
            }
            Err(err) => persistence_failure(cfg, chat_id, err).await,
        },
        Action::DeleteCurrency { name } => {
            let deleted = cfg.engine.delete_currency(&name).await;
            directory_edit(cfg, chat_id, &name, deleted, ui::currency_deleted_text).await
        }
        Action::UpdateCurrencyRate { name, rate } => {
            let updated = cfg.engine.update_currency_rate(&name, rate).await;
            directory_edit(cfg, chat_id, &name, updated, ui::rate_updated_text).await
        }
    }
}

/// Moves on to the amount when `name` is in the directory, otherwise lists
/// what is and keeps asking.
async fn select_convert_currency(cfg: &ConfigParameters, chat_id: ChatId, name: String) -> Reply {
    let found = match cfg.engine.find_currency(&name).await {
        Ok(found) => found,
        Err(err) => return persistence_failure(cfg, chat_id, err).await,
    };
    if let Some(rate) = found {
        let next = Session::AwaitingConvertAmount {
            currency: rate.name,
        };
        let (prompt, markup) = ui::prompt(&next);
        cfg.sessions.set(chat_id, next).await;
        return Reply::new(prompt, markup);
    }

    match cfg.engine.list_currencies().await {
        Ok(currencies) => Reply::new(
            ui::currency_not_found_text(&name, &currencies),
            ui::currency_keyboard(&currencies),
        ),
        Err(err) => persistence_failure(cfg, chat_id, err).await,
    }
}

/// Ends a delete or re-rate dialogue.
async fn directory_edit(
    cfg: &ConfigParameters,
    chat_id: ChatId,
    name: &str,
    result: Result<(), EngineError>,
    done_text: fn(&str) -> String,
) -> Reply {
    match result {
        Ok(()) => {
            cfg.sessions.clear(chat_id).await;
            Reply::new(done_text(name), ui::main_menu())
        }
        Err(EngineError::MissingCurrency(_)) => {
            cfg.sessions.clear(chat_id).await;
            Reply::new(ui::currency_missing_text(name), ui::main_menu())
        }
        Err(err) => persistence_failure(cfg, chat_id, err).await,
    }
}

async fn save_operation(cfg: &ConfigParameters, chat_id: ChatId, draft: Draft) -> Reply {
    let saved = cfg
        .engine
        .insert_operation(chat_id.0, draft.kind, draft.amount, draft.date)
        .await;

    match saved {
        Ok(_) => {
            cfg.sessions.clear(chat_id).await;
            Reply::new(ui::saved_text(&draft), ui::main_menu())
        }
        Err(EngineError::UnknownUser(_)) => {
            cfg.sessions.clear(chat_id).await;
            Reply::new(ui::not_registered_text(), ui::no_keyboard())
        }
        Err(err) => persistence_failure(cfg, chat_id, err).await,
    }
}

/// Logs `err`, drops the dialogue and tells the user to retry later.
async fn persistence_failure(cfg: &ConfigParameters, chat_id: ChatId, err: EngineError) -> Reply {
    tracing::error!("chat {chat_id}: {err}");
    cfg.sessions.clear(chat_id).await;
    Reply::new(ui::try_later_text(), ui::main_menu())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use engine::Engine;
    use migration::MigratorTrait;
    use sea_orm::{Database, DatabaseConnection};

    use super::*;
    use crate::{rates::RateClient, state::SessionStore, ui::labels};

    const CHAT: ChatId = ChatId(7);

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    async fn setup() -> (ConfigParameters, DatabaseConnection) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db.clone()).build().await.unwrap();
        let rates = RateClient::new("http://127.0.0.1:1", Duration::from_millis(100)).unwrap();
        let cfg = ConfigParameters {
            engine,
            rates,
            sessions: SessionStore::default(),
        };
        (cfg, db)
    }

    async fn send(cfg: &ConfigParameters, text: &str) -> Reply {
        let input = match parse_command(text) {
            Some(cmd) => Input::Command {
                cmd,
                first_name: Some("Ivan"),
            },
            None => Input::Text(text),
        };
        respond(cfg, CHAT, input, today()).await
    }

    async fn register(cfg: &ConfigParameters) {
        send(cfg, "/register").await;
        let reply = send(cfg, "Ivan").await;
        assert_eq!(reply.text, ui::registered_text("Ivan"));
    }

    fn buttons(markup: &ReplyMarkup) -> Vec<String> {
        match markup {
            ReplyMarkup::Keyboard(keyboard) => keyboard
                .keyboard
                .iter()
                .flatten()
                .map(|button| button.text.clone())
                .collect(),
            _ => Vec::new(),
        }
    }

    #[tokio::test]
    async fn cancel_without_session() {
        let (cfg, _db) = setup().await;

        let reply = send(&cfg, "/cancel").await;

        assert_eq!(reply.text, "Nothing to cancel.");
        assert_eq!(cfg.sessions.get(CHAT).await, None);
    }

    #[tokio::test]
    async fn register_when_already_registered() {
        let (cfg, _db) = setup().await;
        register(&cfg).await;

        let reply = send(&cfg, "/register").await;

        assert_eq!(reply.text, ui::already_registered_text());
        assert_eq!(cfg.sessions.get(CHAT).await, None);
    }

    #[tokio::test]
    async fn bookkeeping_needs_registration() {
        let (cfg, _db) = setup().await;

        for button in [labels::ADD_OPERATION, labels::REPORTS] {
            let reply = send(&cfg, button).await;
            assert_eq!(reply.text, ui::not_registered_text());
            assert!(buttons(&reply.markup).is_empty());
            assert_eq!(cfg.sessions.get(CHAT).await, None);
        }
    }

    #[tokio::test]
    async fn registration_can_be_cancelled_from_the_name_prompt() {
        let (cfg, _db) = setup().await;

        let reply = send(&cfg, "/register").await;
        assert_eq!(buttons(&reply.markup), vec![labels::CANCEL.to_string()]);

        let reply = send(&cfg, labels::CANCEL).await;
        assert_eq!(reply.text, ui::cancelled_text(Flow::Registration));
        assert!(!cfg.engine.user_exists(CHAT.0).await.unwrap());
    }

    #[tokio::test]
    async fn add_operation_then_report() {
        let (cfg, _db) = setup().await;
        register(&cfg).await;

        send(&cfg, labels::ADD_OPERATION).await;
        send(&cfg, "Expense").await;
        let reply = send(&cfg, "abc").await;
        assert_eq!(reply.text, ParseError::InvalidAmount.to_string());
        send(&cfg, "1500,50").await;
        let reply = send(&cfg, "Today").await;

        assert!(reply.text.starts_with("✅ Operation saved."));
        assert_eq!(cfg.sessions.get(CHAT).await, None);

        send(&cfg, labels::REPORTS).await;
        send(&cfg, "RUB").await;
        let reply = send(&cfg, "All time").await;
        assert!(reply.text.contains("Balance: -1500.50 RUB"), "{}", reply.text);
        assert_eq!(cfg.sessions.get(CHAT).await, None);
    }

    #[tokio::test]
    async fn storage_failure_asks_to_retry_and_clears_session() {
        let (cfg, db) = setup().await;
        register(&cfg).await;
        send(&cfg, labels::ADD_OPERATION).await;
        send(&cfg, "Income").await;
        send(&cfg, "100").await;
        assert!(cfg.sessions.get(CHAT).await.is_some());

        migration::Migrator::down(&db, None).await.unwrap();
        let reply = send(&cfg, "Today").await;

        assert_eq!(reply.text, ui::try_later_text());
        assert_eq!(cfg.sessions.get(CHAT).await, None);

        let reply = send(&cfg, "/register").await;
        assert_eq!(reply.text, ui::try_later_text());
        assert_eq!(cfg.sessions.get(CHAT).await, None);
    }

    #[tokio::test]
    async fn list_currencies() {
        let (cfg, _db) = setup().await;
        assert_eq!(send(&cfg, "/get_currencies").await.text, "ℹ️ No currencies saved yet.");

        cfg.engine.add_currency("USD", 90.5).await.unwrap();
        let reply = send(&cfg, "/get_currencies").await;
        assert_eq!(reply.text, "📊 Current exchange rates:\n• USD: 90.5 RUB");
    }

    #[tokio::test]
    async fn convert_needs_a_currency() {
        let (cfg, _db) = setup().await;

        let reply = send(&cfg, "/convert").await;

        assert_eq!(reply.text, ui::nothing_to_convert_text());
        assert_eq!(cfg.sessions.get(CHAT).await, None);
    }

    #[tokio::test]
    async fn convert_into_rubles() {
        let (cfg, _db) = setup().await;
        cfg.engine.add_currency("USD", 90.5).await.unwrap();

        let reply = send(&cfg, "/convert").await;
        assert!(reply.text.ends_with("Available currencies: USD"));
        assert_eq!(
            buttons(&reply.markup),
            vec!["USD".to_string(), labels::CANCEL.to_string()]
        );

        let reply = send(&cfg, "gbp").await;
        assert!(reply.text.starts_with("❌ Currency 'GBP' not found."));
        assert_eq!(
            cfg.sessions.get(CHAT).await,
            Some(Session::AwaitingConvertCurrency)
        );

        send(&cfg, "usd").await;
        assert_eq!(
            cfg.sessions.get(CHAT).await,
            Some(Session::AwaitingConvertAmount {
                currency: "USD".to_string()
            })
        );

        let reply = send(&cfg, "100").await;
        assert_eq!(
            reply.text,
            "💱 Conversion result:\n100.00 USD = 9050.00 RUB\nRate: 1 USD = 90.5 RUB"
        );
        assert_eq!(cfg.sessions.get(CHAT).await, None);
    }

    #[tokio::test]
    async fn manage_currency_is_admin_only() {
        let (cfg, _db) = setup().await;

        let reply = send(&cfg, "/manage_currency").await;

        assert_eq!(reply.text, ui::no_access_text());
        assert_eq!(cfg.sessions.get(CHAT).await, None);
    }

    #[tokio::test]
    async fn admin_edits_the_directory() {
        let (cfg, _db) = setup().await;
        cfg.engine.grant_admin(CHAT.0).await.unwrap();

        let reply = send(&cfg, "/manage_currency").await;
        assert_eq!(reply.text, "Currency management:");
        send(&cfg, labels::ADD_CURRENCY).await;
        send(&cfg, "eur").await;
        let reply = send(&cfg, "98,7").await;
        assert_eq!(reply.text, ui::currency_added_text("EUR"));

        send(&cfg, "/manage_currency").await;
        send(&cfg, labels::ADD_CURRENCY).await;
        send(&cfg, "EUR").await;
        let reply = send(&cfg, "99").await;
        assert_eq!(reply.text, ui::currency_exists_text("EUR"));

        send(&cfg, "/manage_currency").await;
        send(&cfg, labels::UPDATE_RATE).await;
        send(&cfg, "eur").await;
        let reply = send(&cfg, "100.25").await;
        assert_eq!(reply.text, ui::rate_updated_text("EUR"));
        let eur = cfg.engine.find_currency("EUR").await.unwrap().unwrap();
        assert_eq!(eur.rate, 100.25);

        send(&cfg, "/manage_currency").await;
        send(&cfg, labels::DELETE_CURRENCY).await;
        let reply = send(&cfg, "eur").await;
        assert_eq!(reply.text, ui::currency_deleted_text("EUR"));

        send(&cfg, "/manage_currency").await;
        send(&cfg, labels::DELETE_CURRENCY).await;
        let reply = send(&cfg, "eur").await;
        assert_eq!(reply.text, ui::currency_missing_text("EUR"));
        assert_eq!(cfg.sessions.get(CHAT).await, None);
    }

    #[tokio::test]
    async fn unknown_text_outside_a_dialogue() {
        let (cfg, _db) = setup().await;

        let reply = send(&cfg, "hello").await;

        assert_eq!(reply.text, ui::unknown_text());
        assert_eq!(buttons(&reply.markup), buttons(&ui::main_menu()));
    }
}
