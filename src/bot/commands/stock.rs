//! Stock Discord commands - levels, ingredients and movements.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            money::{parse_price, parse_quantity},
            report,
            stock::{self as stocks, StockTransactionType},
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    const DEFAULT_HISTORY_LIMIT: u64 = 10;
    const MAX_HISTORY_LIMIT: u64 = 50;

    /// Shows every ingredient's stock level.
    #[poise::command(slash_command, prefix_command)]
    pub async fn stock(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let levels = stocks::list_ingredients(&ctx.data().database).await?;

        if levels.is_empty() {
            ctx.say("📦 No ingredients yet. Use `/ingredient_add` to create some!")
                .await?;
            return Ok(());
        }

        let low = levels.iter().filter(|s| s.low_stock).count();
        let mut response = format!("📦 **Stock levels** ({low} low)\n\n");
        for level in &levels {
            writeln!(&mut response, "{}", report::format_stock_level(level))?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Adds an ingredient with zero stock.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ingredient_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Ingredient name"] name: String,
        #[description = "Unit of measure (e.g., kg, pcs)"] unit: String,
        #[description = "Cost per unit"] cost_per_unit: String,
        #[description = "Low stock threshold (default: 0)"] min_stock: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        if stocks::get_ingredient_by_name(db, &name).await?.is_some() {
            ctx.say(format!("❌ Ingredient '{name}' already exists."))
                .await?;
            return Ok(());
        }

        let cost = parse_price(&cost_per_unit)?;
        let threshold = min_stock.as_deref().map_or(Ok(rust_decimal::Decimal::ZERO), parse_price)?;

        let ingredient = stocks::add_ingredient(db, name, unit, cost, threshold).await?;
        ctx.say(format!(
            "✅ Added ingredient **{}** ({}), low stock at {}.",
            ingredient.name,
            ingredient.unit,
            ingredient.min_stock.normalize()
        ))
        .await?;
        Ok(())
    }

    /// Records stock coming in, going out, or a stock-take correction.
    #[poise::command(slash_command, prefix_command)]
    pub async fn stock_record(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Ingredient"]
        #[autocomplete = "autocomplete::autocomplete_ingredient"]
        ingredient: String,
        #[description = "in, out or adjustment"]
        #[autocomplete = "autocomplete::autocomplete_stock_type"]
        kind: String,
        #[description = "Quantity (signed for adjustments, e.g. -2)"] quantity: String,
        #[description = "Reason"] reason: Option<String>,
    ) -> Result<()> {
        let transaction_type: StockTransactionType = kind.parse()?;
        let quantity = parse_quantity(&quantity)?;
        let db = &ctx.data().database;

        let Some(found) = stocks::get_ingredient_by_name(db, &ingredient).await? else {
            ctx.say(format!("❌ Ingredient '{ingredient}' not found."))
                .await?;
            return Ok(());
        };

        let movement =
            stocks::add_stock_transaction(db, found.id, transaction_type, quantity, reason).await?;

        let mut response = format!(
            "✅ Recorded `{transaction_type}` of {} {} for **{}**. Balance: {} {}.",
            movement.transaction.quantity.normalize(),
            movement.ingredient.unit,
            movement.ingredient.name,
            movement.ingredient.current_stock.normalize(),
            movement.ingredient.unit
        );
        if stocks::is_low_stock(&movement.ingredient) {
            write!(
                &mut response,
                "\n⚠️ Low stock (threshold {}).",
                movement.ingredient.min_stock.normalize()
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows recent stock movements.
    #[poise::command(slash_command, prefix_command)]
    pub async fn stock_history(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this ingredient"]
        #[autocomplete = "autocomplete::autocomplete_ingredient"]
        ingredient: Option<String>,
        #[description = "How many entries (default 10, max 50)"] limit: Option<u64>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let ingredient_id = match ingredient.as_deref() {
            Some(name) => {
                let Some(found) = stocks::get_ingredient_by_name(db, name).await? else {
                    ctx.say(format!("❌ Ingredient '{name}' not found.")).await?;
                    return Ok(());
                };
                Some(found.id)
            }
            None => None,
        };

        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT);
        let entries = stocks::recent_stock_transactions(db, ingredient_id, limit).await?;

        if entries.is_empty() {
            ctx.say("📦 No stock movements recorded yet.").await?;
            return Ok(());
        }

        let mut response = String::from("📦 **Recent stock movements**\n\n");
        for entry in &entries {
            writeln!(&mut response, "• {}", report::format_stock_entry(entry))?;
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
