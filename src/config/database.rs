//! Database configuration module for `RestoBuddy`.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables and indexes are generated from the entity definitions with
//! `Schema::create_table_from_entity` / `Schema::create_index_from_entity`, so the
//! schema always matches the Rust structs without hand-written SQL.

use crate::entities::{Category, Ingredient, MenuItem, Order, OrderItem, Payment, StockTransaction};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::{debug, info};

/// Default `SQLite` database used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/resto_buddy.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Directory that must exist before a file-backed `SQLite` URL can be opened.
fn sqlite_parent_dir(url: &str) -> Option<&Path> {
    let path = url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

async fn create_table_for<C, E>(db: &C, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(builder.build(&index)).await?;
    }
    Ok(())
}

/// Creates all tables (and their indexes) if they do not exist yet.
///
/// Parents are created before children so foreign keys resolve.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    create_table_for(db, Category).await?;
    create_table_for(db, MenuItem).await?;
    create_table_for(db, Order).await?;
    create_table_for(db, OrderItem).await?;
    create_table_for(db, Payment).await?;
    create_table_for(db, Ingredient).await?;
    create_table_for(db, StockTransaction).await?;

    info!("Database tables ensured.");
    Ok(())
}
