//! Shared test utilities for `RestoBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        menu::{self, NewMenuItem},
        order::{self, NewOrder, NewOrderItem, PlacedOrder},
        stock,
    },
    entities,
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer tracing subscriber once per test binary.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test category with no description.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    menu::create_category(db, name.to_string(), None).await
}

/// Creates an available, uncategorized menu item.
///
/// # Arguments
/// * `db` - Database connection
/// * `name` - Item name
/// * `price` - Whole-unit price (e.g., `25_000`)
pub async fn create_test_menu_item(
    db: &DatabaseConnection,
    name: &str,
    price: i64,
) -> Result<entities::menu_item::Model> {
    menu::create_menu_item(
        db,
        NewMenuItem {
            name: name.to_string(),
            price: price.to_string(),
            is_available: true,
            ..Default::default()
        },
    )
    .await
}

/// Creates an available menu item under a category.
pub async fn create_categorized_menu_item(
    db: &DatabaseConnection,
    name: &str,
    price: i64,
    category_id: i64,
) -> Result<entities::menu_item::Model> {
    menu::create_menu_item(
        db,
        NewMenuItem {
            name: name.to_string(),
            price: price.to_string(),
            category_id: Some(category_id),
            is_available: true,
            ..Default::default()
        },
    )
    .await
}

/// Creates an ingredient measured in `kg` with the given low-stock threshold.
///
/// # Defaults
/// * `cost_per_unit`: 10000
/// * `current_stock`: 0
pub async fn create_test_ingredient(
    db: &DatabaseConnection,
    name: &str,
    min_stock: i64,
) -> Result<entities::ingredient::Model> {
    stock::add_ingredient(
        db,
        name.to_string(),
        "kg".to_string(),
        Decimal::from(10_000),
        Decimal::from(min_stock),
    )
    .await
}

/// Places an order for `(menu_item_id, quantity, unit_price)` lines with a
/// matching total and default customer details.
pub async fn place_test_order(
    db: &DatabaseConnection,
    lines: &[(i64, i32, i64)],
) -> Result<PlacedOrder> {
    let items: Vec<NewOrderItem> = lines
        .iter()
        .map(|&(menu_item_id, quantity, price)| NewOrderItem {
            menu_item_id,
            quantity,
            price: Decimal::from(price),
            notes: None,
        })
        .collect();
    let total_amount = items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();

    order::create_order(
        db,
        NewOrder {
            items,
            total_amount,
            ..Default::default()
        },
    )
    .await
}
