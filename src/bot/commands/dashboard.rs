//! Dashboard Discord command.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{dashboard as stats, report},
        errors::{Error, Result},
    };

    /// Shows today's orders, revenue, active orders and low stock.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let offset = data.utc_offset();

        let figures = stats::dashboard_stats(
            &data.database,
            stats::today(offset),
            offset,
            data.settings.recent_orders_limit,
        )
        .await?;

        ctx.say(report::format_dashboard(&figures)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
