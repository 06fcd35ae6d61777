use std::env;

use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_URL: &str = "sqlite:./finbot.db?mode=rwc";

/// `DATABASE_URL` wins; otherwise a postgres URL is assembled from the
/// `DB_*` variables when `DB_HOST` is set.
fn database_url() -> String {
    if let Ok(url) = env::var("DATABASE_URL") {
        return url;
    }
    let Ok(host) = env::var("DB_HOST") else {
        return DEFAULT_URL.to_string();
    };
    let var = |name: &str, default: &str| env::var(name).unwrap_or_else(|_| default.to_string());
    format!(
        "postgres://{}:{}@{}:{}/{}",
        var("DB_USER", "postgres"),
        var("DB_PASSWORD", ""),
        host,
        var("DB_PORT", "5432"),
        var("DB_NAME", "finbot"),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cmd = env::args().nth(1).unwrap_or_else(|| "up".to_string());
    let db = Database::connect(database_url()).await?;

    match cmd.as_str() {
        "up" => migration::Migrator::up(&db, None).await?,
        "down" => migration::Migrator::down(&db, None).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        other => {
            return Err(format!(
                "unknown command `{other}`, expected one of: up, down, fresh, status"
            )
            .into());
        }
    }

    Ok(())
}
