//! Start-up seeding from `config.toml`.
//!
//! Entries are matched by name. Anything that already exists is left untouched, so
//! seeding is safe to run on every start.

use crate::{
    config::settings::Config,
    core::{
        menu::{self, NewMenuItem},
        money::parse_price,
        stock,
    },
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use tracing::{debug, info};

/// How many rows each seed list inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Categories inserted
    pub categories: usize,
    /// Menu items inserted
    pub menu_items: usize,
    /// Ingredients inserted
    pub ingredients: usize,
}

/// Inserts configured categories, then menu items, then ingredients.
///
/// # Errors
/// Fails on an unparsable price or a menu item naming an unknown category; rows
/// inserted before the failure stay.
pub async fn seed_from_config(db: &DatabaseConnection, config: &Config) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for category in &config.categories {
        if menu::get_category_by_name(db, &category.name).await?.is_some() {
            debug!("Category '{}' already exists, skipping", category.name);
            continue;
        }
        menu::create_category(db, category.name.clone(), category.description.clone()).await?;
        report.categories += 1;
    }

    for item in &config.menu_items {
        if menu::get_menu_item_by_name(db, &item.name).await?.is_some() {
            debug!("Menu item '{}' already exists, skipping", item.name);
            continue;
        }

        let category_id = match item.category.as_deref() {
            Some(name) => Some(
                menu::get_category_by_name(db, name)
                    .await?
                    .ok_or_else(|| Error::Config {
                        message: format!(
                            "Menu item '{}' refers to unknown category '{name}'",
                            item.name
                        ),
                    })?
                    .id,
            ),
            None => None,
        };

        menu::create_menu_item(
            db,
            NewMenuItem {
                name: item.name.clone(),
                description: item.description.clone(),
                price: item.price.clone(),
                category_id,
                image_url: None,
                preparation_time: item.preparation_time,
                is_available: item.is_available,
            },
        )
        .await?;
        report.menu_items += 1;
    }

    for ingredient in &config.ingredients {
        if stock::get_ingredient_by_name(db, &ingredient.name)
            .await?
            .is_some()
        {
            debug!("Ingredient '{}' already exists, skipping", ingredient.name);
            continue;
        }
        stock::add_ingredient(
            db,
            ingredient.name.clone(),
            ingredient.unit.clone(),
            parse_price(&ingredient.cost_per_unit)?,
            parse_price(&ingredient.min_stock)?,
        )
        .await?;
        report.ingredients += 1;
    }

    info!(
        categories = report.categories,
        menu_items = report.menu_items,
        ingredients = report.ingredients,
        "Seeding complete"
    );
    Ok(report)
}
