//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions come from the database (or the catalog cache) and are filtered by the
//! user's partial input. Lookup failures return an empty list instead of an error.

use crate::{
    bot::BotData,
    core::{
        menu,
        order::{self as orders, OrderStatus},
        stock::{self as stocks, StockTransactionType},
    },
    errors::Error,
};
use tracing::warn;

/// Discord accepts at most this many suggestions.
const MAX_SUGGESTIONS: usize = 25;

/// Payment methods offered at the cashier.
pub const PAYMENT_METHODS: [&str; 4] = ["cash", "qris", "card", "transfer"];

/// Keeps names containing `partial` (case-insensitive), sorted, capped at 25.
#[must_use]
pub fn filter_suggestions<I>(names: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();
    matching.sort();
    matching.dedup();
    matching.truncate(MAX_SUGGESTIONS);
    matching
}

/// Suggests menu item names, including unavailable items, for staff commands.
pub async fn autocomplete_menu_item(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    match menu::list_menu_items(&ctx.data().database).await {
        Ok(items) => filter_suggestions(items.into_iter().map(|e| e.item.name), partial),
        Err(e) => {
            warn!("Menu item autocomplete failed: {}", e);
            Vec::new()
        }
    }
}

/// Suggests category names.
pub async fn autocomplete_category_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(categories) = menu::list_categories(&ctx.data().database).await else {
        return Vec::new();
    };
    filter_suggestions(categories.into_iter().map(|c| c.name), partial)
}

/// Suggests ingredient names.
pub async fn autocomplete_ingredient(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(levels) = stocks::list_ingredients(&ctx.data().database).await else {
        return Vec::new();
    };
    filter_suggestions(levels.into_iter().map(|s| s.ingredient.name), partial)
}

/// Suggests numbers of orders that are still open or unpaid, newest first.
pub async fn autocomplete_order_number(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let (Ok(queue), Ok(unpaid)) = (orders::kitchen_queue(db).await, orders::unpaid_orders(db).await)
    else {
        return Vec::new();
    };

    let partial_upper = partial.trim().to_uppercase();
    let mut numbers: Vec<String> = Vec::new();
    for order in queue.into_iter().chain(unpaid) {
        let number = order.order.order_number;
        if number.contains(&partial_upper) && !numbers.contains(&number) {
            numbers.push(number);
        }
    }
    numbers.truncate(MAX_SUGGESTIONS);
    numbers
}

/// Suggests order statuses staff may set.
pub async fn autocomplete_order_status(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let settable = OrderStatus::ALL
        .into_iter()
        .filter(|s| *s != OrderStatus::Completed && *s != OrderStatus::Pending)
        .map(|s| s.as_str().to_string());
    filter_suggestions(settable, partial)
}

/// Suggests stock movement types.
pub async fn autocomplete_stock_type(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_suggestions(
        StockTransactionType::ALL.map(|t| t.as_str().to_string()),
        partial,
    )
}

/// Suggests payment methods.
pub async fn autocomplete_payment_method(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_suggestions(PAYMENT_METHODS.map(String::from), partial)
}
