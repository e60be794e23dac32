//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the staff console for `RestoBuddy`: slash commands,
//! autocomplete handlers, shared bot context, and the framework runner. Commands only
//! format the results of [`crate::core`] operations.

/// Discord command implementations (menu, orders, kitchen, cashier, stock, dashboard)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    cache::CatalogCache,
    config::settings::Settings,
    core::{
        dashboard,
        menu::{self, MenuCatalog, MenuItemUpdate, NewMenuItem},
        order::{self, NewOrder, PlacedOrder},
    },
    entities::{category, menu_item},
    errors::{Error, Result},
    rate_limit::RateLimiter,
};
use chrono::FixedOffset;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
/// Holds the database connection, runtime settings, and the injectable
/// catalog cache and rate limiter.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Runtime settings from config.toml
    pub settings: Settings,
    /// Cached customer-facing menu
    pub catalog_cache: Arc<CatalogCache>,
    /// Guards order placement
    pub rate_limiter: Arc<RateLimiter>,
}

impl BotData {
    /// Creates a new `BotData`, building the cache and limiter from `settings`.
    #[must_use]
    pub fn new(database: DatabaseConnection, settings: Settings) -> Self {
        let catalog_cache = Arc::new(CatalogCache::new(Duration::from_secs(
            settings.catalog_cache_ttl_secs,
        )));
        let rate_limiter = Arc::new(RateLimiter::new(
            settings.order_rate_limit,
            Duration::from_secs(settings.order_rate_window_secs),
        ));
        Self {
            database,
            settings,
            catalog_cache,
            rate_limiter,
        }
    }

    /// The restaurant's configured UTC offset.
    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        dashboard::offset_from_hours(self.settings.utc_offset_hours)
    }

    /// Current catalog, from the cache when fresh.
    pub async fn catalog(&self) -> Result<Arc<MenuCatalog>> {
        self.catalog_cache.get_or_load(&self.database).await
    }

    // Catalog writes go through these wrappers so the cached menu is always dropped.
    // A failed write invalidates too: it may mean the snapshot was already stale.

    async fn invalidate_after<T>(&self, result: Result<T>) -> Result<T> {
        self.catalog_cache.invalidate().await;
        result
    }

    /// Creates a category and invalidates the catalog.
    pub async fn create_category(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<category::Model> {
        self.invalidate_after(menu::create_category(&self.database, name, description).await)
            .await
    }

    /// Deletes a category and invalidates the catalog.
    pub async fn delete_category(&self, category_id: i64) -> Result<u64> {
        self.invalidate_after(menu::delete_category(&self.database, category_id).await)
            .await
    }

    /// Creates a menu item and invalidates the catalog.
    pub async fn create_menu_item(&self, new_item: NewMenuItem) -> Result<menu_item::Model> {
        self.invalidate_after(menu::create_menu_item(&self.database, new_item).await)
            .await
    }

    /// Updates a menu item and invalidates the catalog.
    pub async fn update_menu_item(
        &self,
        menu_item_id: i64,
        update: MenuItemUpdate,
    ) -> Result<menu_item::Model> {
        self.invalidate_after(menu::update_menu_item(&self.database, menu_item_id, update).await)
            .await
    }

    /// Changes availability and invalidates the catalog.
    pub async fn set_availability(
        &self,
        menu_item_id: i64,
        is_available: bool,
    ) -> Result<menu_item::Model> {
        self.invalidate_after(
            menu::set_availability(&self.database, menu_item_id, is_available).await,
        )
        .await
    }

    /// Deletes a menu item and invalidates the catalog.
    pub async fn delete_menu_item(&self, menu_item_id: i64) -> Result<u64> {
        self.invalidate_after(menu::delete_menu_item(&self.database, menu_item_id).await)
            .await
    }

    /// Places an order and invalidates the catalog.
    pub async fn place_order(&self, new_order: NewOrder) -> Result<PlacedOrder> {
        self.invalidate_after(order::create_order(&self.database, new_order).await)
            .await
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if error.is_user_error() {
                warn!("Command `{}` rejected: {}", ctx.command().name, error);
                format!("❌ {error}")
            } else {
                error!("Error in command `{}`: {:?}", ctx.command().name, error);
                "❌ Something went wrong. Please try again later.".to_string()
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Every slash command the console registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::menu(),
        commands::menu_manage(),
        commands::order(),
        commands::order_status(),
        commands::kitchen(),
        commands::set_status(),
        commands::cancel_order(),
        commands::delete_order(),
        commands::unpaid(),
        commands::pay(),
        commands::stock(),
        commands::ingredient_add(),
        commands::stock_record(),
        commands::stock_history(),
        commands::dashboard(),
    ]
}

/// Connects to Discord and serves commands until the client stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
