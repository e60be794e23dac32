//! Menu Discord commands - `menu` and `menu_manage`.
//!
//! `menu` reads the cached catalog. Every `menu_manage` subcommand writes through the
//! [`BotData`](crate::bot::BotData) wrappers, which invalidate the catalog cache.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            menu::{self, MenuItemUpdate, NewMenuItem},
            money::format_amount,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    async fn find_item(
        ctx: poise::Context<'_, BotData, Error>,
        name: &str,
    ) -> Result<Option<crate::entities::menu_item::Model>> {
        let found = menu::get_menu_item_by_name(&ctx.data().database, name).await?;
        if found.is_none() {
            ctx.say(format!("❌ Menu item '{name}' not found.")).await?;
        }
        Ok(found)
    }

    async fn resolve_category(
        ctx: poise::Context<'_, BotData, Error>,
        name: Option<&str>,
    ) -> Result<Option<i64>> {
        let Some(name) = name else {
            return Ok(None);
        };
        menu::get_category_by_name(&ctx.data().database, name)
            .await?
            .map(|c| Some(c.id))
            .ok_or_else(|| Error::CategoryNotFound {
                id: name.to_string(),
            })
    }

    /// Shows the menu, grouped by category.
    #[poise::command(slash_command, prefix_command)]
    pub async fn menu(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let catalog = ctx.data().catalog().await?;

        if catalog.items.is_empty() {
            ctx.say("🍽️ Nothing on the menu right now.").await?;
            return Ok(());
        }

        let mut embed_fields = Vec::new();
        let groups = catalog
            .categories
            .iter()
            .map(|c| (c.name.as_str(), Some(c.id)))
            .chain(std::iter::once(("Other", None)));

        for (title, category_id) in groups {
            let mut value = String::new();
            for entry in catalog
                .items
                .iter()
                .filter(|e| e.item.category_id == category_id)
            {
                write!(
                    &mut value,
                    "**{}** - {}",
                    entry.item.name,
                    format_amount(entry.item.price)
                )?;
                if let Some(minutes) = entry.item.preparation_time {
                    write!(&mut value, " ({minutes} min)")?;
                }
                writeln!(&mut value)?;
            }
            if !value.is_empty() {
                embed_fields.push((title.to_string(), value, false));
            }
        }

        let menu_embed = serenity::CreateEmbed::default()
            .title(format!("🍽️ {} Menu", ctx.data().settings.restaurant_name))
            .color(0x00E6_7E22)
            .fields(embed_fields)
            .footer(serenity::CreateEmbedFooter::new(
                "Order with /order, e.g. Nasi Goreng x2, Es Teh",
            ));

        ctx.send(poise::CreateReply::default().embed(menu_embed))
            .await?;
        Ok(())
    }

    /// Parent command for managing menu items and categories.
    #[poise::command(
        slash_command,
        subcommands(
            "menu_add",
            "menu_update",
            "menu_availability",
            "menu_delete",
            "menu_list",
            "category_add",
            "category_delete"
        )
    )]
    pub async fn menu_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Menu management command. Available subcommands:\n\
            `/menu_manage add` - Add a menu item\n\
            `/menu_manage update` - Change an item's name, price, category or details\n\
            `/menu_manage availability` - Mark an item available or sold out\n\
            `/menu_manage delete` - Delete an item (order history is kept)\n\
            `/menu_manage list` - List all items, including unavailable ones\n\
            `/menu_manage category_add` - Add a category\n\
            `/menu_manage category_delete` - Delete a category";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a menu item.
    #[poise::command(slash_command, rename = "add")]
    pub async fn menu_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item name"] name: String,
        #[description = "Price (e.g., 25000 or 25,000.00)"] price: String,
        #[description = "Category"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        category: Option<String>,
        #[description = "Short description"] description: Option<String>,
        #[description = "Preparation time in minutes"] preparation_time: Option<i32>,
        #[description = "Image URL"] image_url: Option<String>,
        #[description = "Available right away? (default: true)"] available: Option<bool>,
    ) -> Result<()> {
        let category_id = resolve_category(ctx, category.as_deref()).await?;

        let item = ctx
            .data()
            .create_menu_item(NewMenuItem {
                name,
                description,
                price,
                category_id,
                image_url,
                preparation_time,
                is_available: available.unwrap_or(true),
            })
            .await?;

        ctx.say(format!(
            "✅ Added **{}** at {}.",
            item.name,
            format_amount(item.price)
        ))
        .await?;
        Ok(())
    }

    /// Updates a menu item. Only the given fields change.
    #[poise::command(slash_command, rename = "update")]
    pub async fn menu_update(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to update"]
        #[autocomplete = "autocomplete::autocomplete_menu_item"]
        name: String,
        #[description = "New name"] new_name: Option<String>,
        #[description = "New price"] price: Option<String>,
        #[description = "New category"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        category: Option<String>,
        #[description = "Remove the item from its category"] clear_category: Option<bool>,
        #[description = "New description"] description: Option<String>,
        #[description = "New preparation time in minutes"] preparation_time: Option<i32>,
        #[description = "New image URL"] image_url: Option<String>,
    ) -> Result<()> {
        let Some(item) = find_item(ctx, &name).await? else {
            return Ok(());
        };

        let category_id = if clear_category.unwrap_or(false) {
            Some(None)
        } else {
            resolve_category(ctx, category.as_deref()).await?.map(Some)
        };

        let update = MenuItemUpdate {
            name: new_name,
            description,
            price,
            category_id,
            image_url,
            preparation_time,
            is_available: None,
        };
        let updated = ctx.data().update_menu_item(item.id, update).await?;

        ctx.say(format!(
            "✅ Updated **{}** ({}).",
            updated.name,
            format_amount(updated.price)
        ))
        .await?;
        Ok(())
    }

    /// Marks a menu item available or sold out.
    #[poise::command(slash_command, rename = "availability")]
    pub async fn menu_availability(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Menu item"]
        #[autocomplete = "autocomplete::autocomplete_menu_item"]
        name: String,
        #[description = "Can customers order it?"] available: bool,
    ) -> Result<()> {
        let Some(item) = find_item(ctx, &name).await? else {
            return Ok(());
        };

        ctx.data().set_availability(item.id, available).await?;

        let state = if available { "available" } else { "sold out" };
        ctx.say(format!("✅ **{}** is now {state}.", item.name))
            .await?;
        Ok(())
    }

    /// Deletes a menu item. Past orders keep the item's name and price.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn menu_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Menu item to delete"]
        #[autocomplete = "autocomplete::autocomplete_menu_item"]
        name: String,
    ) -> Result<()> {
        let Some(item) = find_item(ctx, &name).await? else {
            return Ok(());
        };

        let detached = ctx.data().delete_menu_item(item.id).await?;

        ctx.say(format!(
            "✅ Deleted **{}**. {detached} past order line(s) keep their history.",
            item.name
        ))
        .await?;
        Ok(())
    }

    /// Lists every menu item, including unavailable ones.
    #[poise::command(slash_command, rename = "list")]
    pub async fn menu_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let items = menu::list_menu_items(&ctx.data().database).await?;

        if items.is_empty() {
            ctx.say("No menu items yet. Use `/menu_manage add` to create some!")
                .await?;
            return Ok(());
        }

        let mut response = String::from("📋 **All Menu Items**\n\n");
        for entry in items {
            let availability = if entry.item.is_available { "🟢" } else { "⛔" };
            let category = entry
                .category
                .as_ref()
                .map_or("Uncategorized", |c| c.name.as_str());
            writeln!(
                &mut response,
                "{availability} **{}** - {} ({category})",
                entry.item.name,
                format_amount(entry.item.price)
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Adds a menu category.
    #[poise::command(slash_command, rename = "category_add")]
    pub async fn category_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category name"] name: String,
        #[description = "Description"] description: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        if menu::get_category_by_name(db, &name).await?.is_some() {
            ctx.say(format!("❌ Category '{name}' already exists."))
                .await?;
            return Ok(());
        }

        let category = ctx.data().create_category(name, description).await?;

        ctx.say(format!("✅ Added category **{}**.", category.name))
            .await?;
        Ok(())
    }

    /// Deletes a category. Its items stay on the menu without a category.
    #[poise::command(slash_command, rename = "category_delete")]
    pub async fn category_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category to delete"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(category) = menu::get_category_by_name(db, &name).await? else {
            ctx.say(format!("❌ Category '{name}' not found.")).await?;
            return Ok(());
        };

        let detached = ctx.data().delete_category(category.id).await?;

        ctx.say(format!(
            "✅ Deleted category **{}**. {detached} item(s) are now uncategorized.",
            category.name
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
