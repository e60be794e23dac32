//! Kitchen Discord commands - `kitchen`, `set_status` and `cancel_order`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            order::{self as orders, OrderStatus},
            report,
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Lists orders waiting to be confirmed, prepared or served.
    #[poise::command(slash_command, prefix_command)]
    pub async fn kitchen(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let queue = orders::kitchen_queue(&ctx.data().database).await?;

        if queue.is_empty() {
            ctx.say("🍳 The kitchen queue is empty.").await?;
            return Ok(());
        }

        let mut response = format!("🍳 **Kitchen queue** ({} orders)\n\n", queue.len());
        for order in &queue {
            writeln!(&mut response, "{}", report::format_order_summary(order))?;
            for item in &order.items {
                writeln!(&mut response, "    • {}", report::format_order_line(item))?;
            }
            if let Ok(status) = order.status() {
                if let Some(next) = status.next_kitchen_step() {
                    writeln!(&mut response, "    ➡️ next: `{next}`")?;
                }
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Moves an order to a new status (one step at a time, or cancelled).
    #[poise::command(slash_command, prefix_command)]
    pub async fn set_status(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order number"]
        #[autocomplete = "autocomplete::autocomplete_order_number"]
        order_number: String,
        #[description = "New status"]
        #[autocomplete = "autocomplete::autocomplete_order_status"]
        status: String,
    ) -> Result<()> {
        let new_status: OrderStatus = status.parse()?;
        let db = &ctx.data().database;

        let Some(order) = orders::get_order_by_number(db, &order_number).await? else {
            ctx.say(format!("❌ Order '{order_number}' not found."))
                .await?;
            return Ok(());
        };

        let updated = orders::update_order_status(db, order.order.id, new_status).await?;

        ctx.say(format!(
            "{} Order **{}** is now `{}`.",
            report::status_emoji(new_status),
            updated.order_number,
            updated.status
        ))
        .await?;
        Ok(())
    }

    /// Cancels an order that has not been paid.
    #[poise::command(slash_command, prefix_command)]
    pub async fn cancel_order(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order number"]
        #[autocomplete = "autocomplete::autocomplete_order_number"]
        order_number: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(order) = orders::get_order_by_number(db, &order_number).await? else {
            ctx.say(format!("❌ Order '{order_number}' not found."))
                .await?;
            return Ok(());
        };

        let cancelled = orders::cancel_order(db, order.order.id).await?;
        ctx.say(format!("❌ Order **{}** cancelled.", cancelled.order_number))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
