use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use server::Service;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv::dotenv().ok();
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "finbot={level},telegram_bot={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    if let Some(rates) = settings.rate_service {
        let listener = tokio::net::TcpListener::bind(rates.addr()).await?;
        tasks.spawn(async move {
            if let Err(err) = server::run_with_listener(Service::Rates, listener).await {
                tracing::error!("rate service failed: {err}");
            }
        });
    }

    if let Some(numbers) = settings.number_service {
        let listener = tokio::net::TcpListener::bind(numbers.addr()).await?;
        tasks.spawn(async move {
            if let Err(err) = server::run_with_listener(Service::Numbers, listener).await {
                tracing::error!("number service failed: {err}");
            }
        });
    }

    if let Some(telegram) = settings.telegram {
        tracing::info!("Found telegram settings...");
        // Refuse to serve against a database whose tables are unreachable.
        let engine = connect_engine(&settings.database).await?;
        for chat_id in &telegram.admins {
            engine.grant_admin(*chat_id).await?;
        }
        let bot = telegram_bot::Bot::builder()
            .token(&telegram.token)
            .engine(engine)
            .rate_service(
                &telegram.rate_service_url,
                Duration::from_secs(telegram.rate_timeout_secs),
            )
            .build()?;
        tasks.spawn(async move { bot.run().await });
    }

    if tasks.is_empty() {
        tracing::warn!("no service configured, exiting");
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn connect_engine(
    config: &settings::Database,
) -> Result<engine::Engine, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(config.url()).await?;
    if config.migrate {
        Migrator::up(&database, None).await?;
    }

    let engine = engine::Engine::builder().database(database).build().await?;
    Ok(engine)
}
