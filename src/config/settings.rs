//! Application configuration loading from config.toml
//!
//! `config.toml` carries runtime settings for the restaurant (time zone, cache TTL,
//! rate limits) and optional seed lists for categories, menu items and ingredients.
//! Seed entries are inserted on start-up when no row with the same name exists.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Runtime settings
    #[serde(default)]
    pub settings: Settings,
    /// Categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Menu items to seed
    #[serde(default)]
    pub menu_items: Vec<MenuItemConfig>,
    /// Ingredients to seed
    #[serde(default)]
    pub ingredients: Vec<IngredientConfig>,
}

/// Runtime settings with defaults for every field
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    /// Name shown in console replies
    pub restaurant_name: String,
    /// Offset from UTC used to decide what "today" means on the dashboard
    pub utc_offset_hours: i32,
    /// How long a menu catalog snapshot stays fresh
    pub catalog_cache_ttl_secs: u64,
    /// Number of recent orders shown on the dashboard
    pub recent_orders_limit: u64,
    /// Orders a single caller may place per window
    pub order_rate_limit: u32,
    /// Length of the rate limit window
    pub order_rate_window_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            restaurant_name: "RestoBuddy".to_string(),
            utc_offset_hours: 0,
            catalog_cache_ttl_secs: 300,
            recent_orders_limit: 5,
            order_rate_limit: 10,
            order_rate_window_secs: 900,
        }
    }
}

/// Configuration for a single seeded category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Category name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

/// Configuration for a single seeded menu item
#[derive(Debug, Deserialize, Clone)]
pub struct MenuItemConfig {
    /// Item name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Price as written on the menu (e.g., `"25000"` or `"25,000.00"`)
    pub price: String,
    /// Name of a seeded or existing category
    pub category: Option<String>,
    /// Preparation time in minutes
    pub preparation_time: Option<i32>,
    /// Whether the item can be ordered, defaults to true
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// Configuration for a single seeded ingredient
#[derive(Debug, Deserialize, Clone)]
pub struct IngredientConfig {
    /// Ingredient name
    pub name: String,
    /// Unit of measure
    pub unit: String,
    /// Cost per unit
    pub cost_per_unit: String,
    /// Low stock threshold
    #[serde(default = "default_zero")]
    pub min_stock: String,
}

const fn default_true() -> bool {
    true
}

fn default_zero() -> String {
    "0".to_string()
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from the default location (./config.toml), falling back to
/// defaults when the file does not exist.
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_config(path)
    } else {
        tracing::warn!("config.toml not found, using default settings and no seed data");
        Ok(Config::default())
    }
}
