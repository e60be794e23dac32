//! Order Discord commands - `order` and `order_status`.
//!
//! Customers list what they want as free text (`Nasi Goreng x2 (no chili), Es Teh`).
//! A note in parentheses belongs to that line only. The text is
//! resolved against the cached catalog, priced at the catalog price, and handed to
//! [`crate::core::order::create_order`], which re-checks everything against the
//! database inside its transaction.

use crate::errors::{Error, Result};

/// One parsed `name x quantity (notes)` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedItem {
    /// Menu item name as typed
    pub name: String,
    /// Units requested
    pub quantity: i32,
    /// Kitchen notes for this line
    pub notes: Option<String>,
}

/// Parses `"Nasi Goreng x2 (no chili), Es Teh, Ayam Bakar x 3"` into requested items.
///
/// A missing quantity means one. Repeated names are merged and their notes joined.
pub fn parse_order_items(input: &str) -> Result<Vec<RequestedItem>> {
    let mut items: Vec<RequestedItem> = Vec::new();

    for part in input.split([',', ';', '\n']) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (part, notes) = part
            .strip_suffix(')')
            .and_then(|rest| rest.rsplit_once('('))
            .map_or((part, None), |(head, note)| {
                let note = note.trim();
                (head.trim(), (!note.is_empty()).then(|| note.to_string()))
            });

        // A trailing `x<number>` is a quantity; any other 'x' is part of the name
        let (name, quantity) = part
            .rsplit_once(['x', 'X', '×', '*'])
            .and_then(|(name, qty)| Some((name.trim(), qty.trim().parse::<i32>().ok()?)))
            .filter(|(name, _)| !name.is_empty())
            .unwrap_or((part, 1));

        if quantity <= 0 {
            return Err(Error::validation(format!(
                "Quantity for '{name}' must be positive"
            )));
        }

        match items
            .iter_mut()
            .find(|i| i.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(quantity).ok_or_else(|| {
                    Error::validation(format!("Quantity for '{name}' is too large"))
                })?;
                existing.notes = match (existing.notes.take(), notes) {
                    (Some(first), Some(second)) => Some(format!("{first}; {second}")),
                    (first, second) => first.or(second),
                };
            }
            None => items.push(RequestedItem {
                name: name.to_string(),
                quantity,
                notes,
            }),
        }
    }

    if items.is_empty() {
        return Err(Error::validation(
            "List at least one menu item, e.g. `Nasi Goreng x2, Es Teh`",
        ));
    }
    Ok(items)
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::parse_order_items;
    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            money::{checked_sum, format_amount, line_total},
            order::{self as orders, NewOrder, NewOrderItem},
            payment, report,
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;
    use tracing::info;

    /// Places an order from the menu.
    #[poise::command(slash_command, prefix_command)]
    pub async fn order(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Items with optional notes, e.g. 'Nasi Goreng x2 (no chili), Es Teh'"]
        items: String,
        #[description = "Your name"] name: Option<String>,
        #[description = "Table number (leave empty for takeaway)"] table: Option<String>,
        #[description = "Phone number"] phone: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let author_id = ctx.author().id.to_string();
        data.rate_limiter
            .check(&format!("user-{author_id}-order"))
            .await?;

        let requested = parse_order_items(&items)?;
        let catalog = data.catalog().await?;

        let mut lines = Vec::with_capacity(requested.len());
        for request in requested {
            let Some(entry) = catalog.find_item(&request.name) else {
                ctx.say(format!(
                    "❌ '{}' is not on the menu right now. Use `/menu` to see what's available.",
                    request.name
                ))
                .await?;
                return Ok(());
            };
            lines.push(NewOrderItem {
                menu_item_id: entry.item.id,
                quantity: request.quantity,
                price: entry.item.price,
                notes: request.notes,
            });
        }

        let total_amount = checked_sum(
            lines
                .iter()
                .map(|l| line_total(l.price, l.quantity))
                .collect::<Result<Vec<_>>>()?,
        )?;

        let placed = data
            .place_order(NewOrder {
                customer_name: name,
                customer_phone: phone,
                table_number: table,
                items: lines,
                total_amount,
                request_token: Some(format!("discord-{}", ctx.id())),
            })
            .await?;

        info!(order_number = %placed.order_number, user = %author_id, "Order placed from console");
        ctx.say(format!(
            "✅ Order **{}** placed. Total: **{}**. Track it with `/order_status {}`.",
            placed.order_number,
            format_amount(placed.total_amount),
            placed.order_number
        ))
        .await?;
        Ok(())
    }

    /// Shows an order, its items and its payment.
    #[poise::command(slash_command, prefix_command)]
    pub async fn order_status(
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

        let mut response = report::format_order_detail(&order);
        if let Some(paid) = payment::get_payment_for_order(db, order.order.id).await? {
            write!(
                &mut response,
                "\nPaid {} by {} (change {})",
                format_amount(paid.amount_paid),
                paid.payment_method,
                format_amount(paid.change_amount)
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_order_items_quantities() {
        let items = parse_order_items("Nasi Goreng x2, Es Teh; Ayam Bakar X 3").unwrap();
        assert_eq!(
            items,
            vec![
                RequestedItem {
                    name: "Nasi Goreng".to_string(),
                    quantity: 2,
                    notes: None,
                },
                RequestedItem {
                    name: "Es Teh".to_string(),
                    quantity: 1,
                    notes: None,
                },
                RequestedItem {
                    name: "Ayam Bakar".to_string(),
                    quantity: 3,
                    notes: None,
                },
            ]
        );
    }

    #[test]
    fn test_parse_order_items_merges_and_keeps_names_with_x() {
        let items = parse_order_items("es teh x1, Es Teh x2, Extra Rice").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, 3);
        // No trailing number, so the 'x' belongs to the name
        assert_eq!(items[1].name, "Extra Rice");
        assert_eq!(items[1].quantity, 1);
    }

    #[test]
    fn test_parse_order_items_notes_stay_on_their_line() {
        let items =
            parse_order_items("Nasi Goreng x2 (no chili), Es Teh, es teh x1 (less sugar)")
                .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Nasi Goreng");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].notes.as_deref(), Some("no chili"));
        assert_eq!(items[1].quantity, 2);
        assert_eq!(items[1].notes.as_deref(), Some("less sugar"));

        let items = parse_order_items("Es Teh ( )").unwrap();
        assert_eq!(items[0].name, "Es Teh");
        assert_eq!(items[0].notes, None);
    }

    #[test]
    fn test_parse_order_items_rejections() {
        assert!(matches!(
            parse_order_items(" , ;"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            parse_order_items("Es Teh x0"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            parse_order_items("Es Teh x-1"),
            Err(Error::Validation { .. })
        ));
    }
}
