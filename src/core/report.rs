//! Text formatting for orders, receipts and stock.
//!
//! These helpers turn core results into short plain-text lines. They hold no business
//! rules, so any front end can reuse them.

use crate::{
    core::{
        dashboard::DashboardStats,
        money::{format_amount, line_total},
        order::{OrderStatus, OrderWithItems},
        stock::{IngredientStatus, StockTransactionEntry},
    },
    entities::{order_item, payment},
};
use std::fmt::Write;

/// Emoji badge for an order status.
#[must_use]
pub const fn status_emoji(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "🕒",
        OrderStatus::Confirmed => "📝",
        OrderStatus::Preparing => "🍳",
        OrderStatus::Ready => "🔔",
        OrderStatus::Completed => "✅",
        OrderStatus::Cancelled => "❌",
    }
}

/// One order line, e.g. `2 × Nasi Goreng @ 25,000.00 = 50,000.00`.
#[must_use]
pub fn format_order_line(item: &order_item::Model) -> String {
    let subtotal = line_total(item.price, item.quantity)
        .map_or_else(|_| "?".to_string(), format_amount);
    let mut line = format!(
        "{} × {} @ {} = {subtotal}",
        item.quantity,
        item.item_name,
        format_amount(item.price),
    );
    if let Some(notes) = &item.notes {
        let _ = write!(line, " ({notes})");
    }
    line
}

/// Single-line order summary for lists.
#[must_use]
pub fn format_order_summary(order: &OrderWithItems) -> String {
    let badge = order.status().map_or("❔", status_emoji);
    format!(
        "{badge} **{}** | {} | {} | {} item(s) | {} | {}",
        order.order.order_number,
        order.order.table_number,
        order.order.customer_name,
        order.unit_count(),
        format_amount(order.order.total_amount),
        order.order.status
    )
}

/// Multi-line order detail with every line item.
#[must_use]
pub fn format_order_detail(order: &OrderWithItems) -> String {
    let mut text = format!("{}\n", format_order_summary(order));
    for item in &order.items {
        let _ = writeln!(text, "• {}", format_order_line(item));
    }
    if let Some(phone) = &order.order.customer_phone {
        let _ = writeln!(text, "Phone: {phone}");
    }
    let _ = write!(
        text,
        "Placed: {}",
        order.order.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    text
}

/// Receipt text for a paid order.
#[must_use]
pub fn format_receipt(restaurant: &str, order: &OrderWithItems, payment: &payment::Model) -> String {
    let mut text = format!("**{restaurant}**\nOrder {}\n", order.order.order_number);
    for item in &order.items {
        let _ = writeln!(text, "{}", format_order_line(item));
    }
    let _ = writeln!(text, "Total: {}", format_amount(order.order.total_amount));
    let _ = writeln!(
        text,
        "Paid ({}): {}",
        payment.payment_method,
        format_amount(payment.amount_paid)
    );
    let _ = write!(text, "Change: {}", format_amount(payment.change_amount));
    text
}

/// Stock level line with a warning marker when low.
#[must_use]
pub fn format_stock_level(status: &IngredientStatus) -> String {
    let marker = if status.low_stock { "⚠️" } else { "🟢" };
    format!(
        "{marker} **{}**: {} {} (min {})",
        status.ingredient.name,
        status.ingredient.current_stock.normalize(),
        status.ingredient.unit,
        status.ingredient.min_stock.normalize()
    )
}

/// History line for one stock movement.
#[must_use]
pub fn format_stock_entry(entry: &StockTransactionEntry) -> String {
    let (name, unit) = entry
        .ingredient
        .as_ref()
        .map_or(("Unknown ingredient", ""), |i| (i.name.as_str(), i.unit.as_str()));
    let reason = entry.transaction.reason.as_deref().unwrap_or("-");
    format!(
        "{} | {} | {name} | {} {unit} | {reason}",
        entry.transaction.created_at.format("%Y-%m-%d %H:%M"),
        entry.transaction.transaction_type,
        entry.transaction.quantity.normalize(),
    )
}

/// Dashboard summary block.
#[must_use]
pub fn format_dashboard(stats: &DashboardStats) -> String {
    let mut text = format!("📊 **Dashboard for {}**\n", stats.day.format("%Y-%m-%d"));
    let _ = writeln!(text, "Orders today: {}", stats.orders_today);
    let _ = writeln!(text, "Revenue today: {}", format_amount(stats.revenue_today));
    let _ = writeln!(text, "Active orders: {}", stats.active_orders);
    let _ = writeln!(text, "Low stock ingredients: {}", stats.low_stock_count);
    if stats.recent_orders.is_empty() {
        text.push_str("\n_No orders yet_");
    } else {
        text.push_str("\n**Recent orders:**\n");
        for order in &stats.recent_orders {
            let _ = writeln!(text, "{}", format_order_summary(order));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{ingredient, order, stock_transaction};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn sample_order() -> OrderWithItems {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 12, 30, 0).unwrap();
        OrderWithItems {
            order: order::Model {
                id: 1,
                order_number: "ORD-261016-123000-0042".to_string(),
                customer_name: "Budi".to_string(),
                customer_phone: None,
                table_number: "7".to_string(),
                total_amount: Decimal::from(55_000),
                status: "ready".to_string(),
                request_token: None,
                created_at: at,
                updated_at: at,
            },
            items: vec![
                order_item::Model {
                    id: 1,
                    order_id: 1,
                    menu_item_id: Some(1),
                    item_name: "Nasi Goreng".to_string(),
                    quantity: 1,
                    price: Decimal::from(25_000),
                    notes: Some("extra spicy".to_string()),
                },
                order_item::Model {
                    id: 2,
                    order_id: 1,
                    menu_item_id: None,
                    item_name: "Ayam Bakar".to_string(),
                    quantity: 1,
                    price: Decimal::from(30_000),
                    notes: None,
                },
            ],
        }
    }

    #[test]
    fn test_format_order_line() {
        let order = sample_order();
        assert_eq!(
            format_order_line(&order.items[0]),
            "1 × Nasi Goreng @ 25,000.00 = 25,000.00 (extra spicy)"
        );
    }

    #[test]
    fn test_format_order_summary_and_detail() {
        let order = sample_order();
        let summary = format_order_summary(&order);
        assert!(summary.starts_with("🔔 **ORD-261016-123000-0042**"));
        assert!(summary.contains("55,000.00"));
        assert!(summary.contains("2 item(s)"));

        let detail = format_order_detail(&order);
        assert_eq!(detail.lines().count(), 4);
        assert!(detail.ends_with("Placed: 2026-10-16 12:30 UTC"));
    }

    #[test]
    fn test_format_receipt() {
        let order = sample_order();
        let payment = payment::Model {
            id: 1,
            order_id: 1,
            amount_paid: Decimal::from(60_000),
            payment_method: "cash".to_string(),
            change_amount: Decimal::from(5_000),
            paid_at: order.order.created_at,
        };
        let receipt = format_receipt("RestoBuddy", &order, &payment);
        assert!(receipt.contains("Total: 55,000.00"));
        assert!(receipt.contains("Paid (cash): 60,000.00"));
        assert!(receipt.ends_with("Change: 5,000.00"));
    }

    #[test]
    fn test_format_stock() {
        let rice = ingredient::Model {
            id: 1,
            name: "Rice".to_string(),
            unit: "kg".to_string(),
            current_stock: Decimal::from(4),
            min_stock: Decimal::from(5),
            cost_per_unit: Decimal::from(12_000),
        };
        let level = format_stock_level(&IngredientStatus::from(rice.clone()));
        assert_eq!(level, "⚠️ **Rice**: 4 kg (min 5)");

        let entry = StockTransactionEntry {
            transaction: stock_transaction::Model {
                id: 1,
                ingredient_id: 1,
                transaction_type: "out".to_string(),
                quantity: Decimal::from(6),
                reason: None,
                created_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 5, 0).unwrap(),
            },
            ingredient: Some(rice),
        };
        assert_eq!(
            format_stock_entry(&entry),
            "2026-10-16 09:05 | out | Rice | 6 kg | -"
        );
    }
}
