//! Cashier Discord commands - `unpaid`, `pay` and `delete_order`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            money::{checked_sum, format_amount, parse_price},
            order as orders, payment, report,
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Lists orders that still need to be paid.
    #[poise::command(slash_command, prefix_command)]
    pub async fn unpaid(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let open = orders::unpaid_orders(&ctx.data().database).await?;

        if open.is_empty() {
            ctx.say("💰 No unpaid orders.").await?;
            return Ok(());
        }

        let outstanding = checked_sum(open.iter().map(|o| o.order.total_amount))?;
        let mut response = format!(
            "💰 **Unpaid orders** ({}, {} outstanding)\n\n",
            open.len(),
            format_amount(outstanding)
        );
        for order in &open {
            writeln!(&mut response, "{}", report::format_order_summary(order))?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Records a payment, completes the order and prints a receipt.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pay(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order number"]
        #[autocomplete = "autocomplete::autocomplete_order_number"]
        order_number: String,
        #[description = "Amount received (e.g., 60000)"] amount_paid: String,
        #[description = "Payment method"]
        #[autocomplete = "autocomplete::autocomplete_payment_method"]
        method: String,
        #[description = "Total shown to the customer (defaults to the order total)"]
        total: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let amount_paid = parse_price(&amount_paid)?;

        let Some(order) = orders::get_order_by_number(&data.database, &order_number).await?
        else {
            ctx.say(format!("❌ Order '{order_number}' not found."))
                .await?;
            return Ok(());
        };

        let total_amount = match total {
            Some(text) => parse_price(&text)?,
            None => order.order.total_amount,
        };

        let paid = payment::process_payment(
            &data.database,
            order.order.id,
            amount_paid,
            &method,
            total_amount,
        )
        .await?;

        let receipt = report::format_receipt(&data.settings.restaurant_name, &order, &paid);
        ctx.say(format!("✅ Payment recorded.\n\n{receipt}")).await?;
        Ok(())
    }

    /// Permanently deletes an order with its items and payment.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_order(
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

        orders::delete_order(db, order.order.id).await?;
        ctx.say(format!(
            "🗑️ Order **{}** and its payment were deleted.",
            order.order.order_number
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
