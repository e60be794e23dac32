//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = format!(
            "**{} Help**\n\
        Here is a summary of all available commands.\n\n\
        **Customers**\n\
        • `/menu` - Shows the menu.\n\
        • `/order <items> [name] [table] [phone]` - Places an order, e.g. `Nasi Goreng x2 (no chili), Es Teh`.\n\
        • `/order_status <order>` - Shows an order and its status.\n\n\
        **Kitchen**\n\
        • `/kitchen` - Lists orders waiting to be prepared.\n\
        • `/set_status <order> <status>` - Moves an order to its next step.\n\
        • `/cancel_order <order>` - Cancels an open order.\n\n\
        **Cashier**\n\
        • `/unpaid` - Lists orders waiting for payment.\n\
        • `/pay <order> <amount> <method>` - Records a payment and prints the receipt.\n\
        • `/delete_order <order>` - Permanently removes an order.\n\n\
        **Stock**\n\
        • `/stock` - Shows ingredient levels.\n\
        • `/ingredient_add` - Adds an ingredient.\n\
        • `/stock_record <ingredient> <in|out|adjustment> <quantity>` - Records a movement.\n\
        • `/stock_history [ingredient]` - Shows recent movements.\n\n\
        **Management**\n\
        • `/menu_manage <subcommand>` - Manage menu items and categories.\n\
        • `/dashboard` - Shows today's figures.\n\
        • `/ping` - Checks if the bot is responsive.",
            ctx.data().settings.restaurant_name
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
