use dotenvy::dotenv;
use resto_buddy::{
    bot::{self, BotData},
    config::{database, settings},
    core::seed,
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load config.toml (defaults when missing)
    let config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(
        "Loaded configuration for {}.",
        config.settings.restaurant_name
    );

    // 4. Connect and create tables
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed menu and ingredients from config.toml
    seed::seed_from_config(&db, &config)
        .await
        .inspect_err(|e| error!("Failed to seed initial data: {}", e))?;

    // 6. Run the bot; the token is read right before use
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, BotData::new(db, config.settings)).await
}
