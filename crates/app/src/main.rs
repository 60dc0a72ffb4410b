use std::sync::Arc;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use server::{IdentityProvider, RateClient, ServerState};

use settings::Database;

mod settings;

const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "divvy={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let identity_timeout = Duration::from_secs(
        settings
            .identity
            .timeout_secs
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
    );
    let identity = IdentityProvider::http(&settings.identity.userinfo_url, identity_timeout)
        .map_err(|err| format!("failed to initialize identity provider: {err:?}"))?;

    let rates = match settings.rates {
        Some(rates) => {
            let timeout = Duration::from_secs(
                rates
                    .timeout_secs
                    .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            );
            let client = RateClient::http(&rates.url, &rates.app_id, timeout)
                .map_err(|err| format!("failed to initialize rate quote client: {err:?}"))?;
            Some(Arc::new(client))
        }
        None => {
            tracing::info!("no rate quote service configured, totals stay in the base unit");
            None
        }
    };

    let state = ServerState {
        engine: Arc::new(engine),
        identity: Arc::new(identity),
        rates,
    };

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(state, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
