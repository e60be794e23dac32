//! Order ledger - placing orders and moving them through the kitchen lifecycle.
//!
//! Orders start as `pending` and step forward `pending → confirmed → preparing →
//! ready`. Any non-terminal order may be cancelled. `completed` is only ever set by
//! [`crate::core::payment::process_payment`], so a completed order always has exactly
//! one payment and vice versa. Placing an order writes the order and all its lines in
//! one database transaction; deleting one removes payment, lines and order together.

use crate::{
    core::money::{checked_sum, ensure_in_range, line_total, normalize},
    entities::{MenuItem, Order, OrderItem, Payment, menu_item, order, order_item, payment},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::{
    LoaderTrait, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};
use tracing::{debug, info, instrument, warn};

/// Customer name stored when none is given.
pub const DEFAULT_CUSTOMER_NAME: &str = "Guest";
/// Table number stored when none is given.
pub const DEFAULT_TABLE_NUMBER: &str = "Takeaway";

const ORDER_NUMBER_ATTEMPTS: usize = 5;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, waiting for staff
    Pending,
    /// Accepted by staff
    Confirmed,
    /// Being cooked
    Preparing,
    /// Ready to serve or pick up
    Ready,
    /// Paid; terminal
    Completed,
    /// Cancelled; terminal
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Statuses the kitchen still has to act on.
    pub const ACTIVE: [Self; 4] = [Self::Pending, Self::Confirmed, Self::Preparing, Self::Ready];

    /// Name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// `completed` and `cancelled` accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// The next kitchen step, if there is one.
    #[must_use]
    pub const fn next_kitchen_step(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready | Self::Completed | Self::Cancelled => None,
        }
    }

    /// Whether a staff status update from `self` to `to` is allowed.
    ///
    /// Moving to `completed` is never allowed here; only a payment completes an order.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match to {
            Self::Cancelled => true,
            Self::Completed => false,
            _ => self.next_kitchen_step() == Some(to),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| Error::validation(format!("Unknown order status '{s}'")))
    }
}

/// One requested line of a new order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    /// Menu item being ordered
    pub menu_item_id: i64,
    /// Units ordered, must be positive
    pub quantity: i32,
    /// Unit price shown to the customer when ordering
    pub price: Decimal,
    /// Optional kitchen notes
    pub notes: Option<String>,
}

/// Input for [`create_order`].
#[derive(Debug, Clone, Default)]
pub struct NewOrder {
    /// Customer name, `"Guest"` when blank
    pub customer_name: Option<String>,
    /// Optional phone number
    pub customer_phone: Option<String>,
    /// Table number, `"Takeaway"` when blank
    pub table_number: Option<String>,
    /// Order lines
    pub items: Vec<NewOrderItem>,
    /// Total the customer agreed to; must equal the sum of the lines
    pub total_amount: Decimal,
    /// Client idempotency key; resubmitting it returns the first order
    pub request_token: Option<String>,
}

/// Receipt data returned by [`create_order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    /// Database ID
    pub id: i64,
    /// Human-readable order number
    pub order_number: String,
    /// Stored total
    pub total_amount: Decimal,
    /// True when an earlier order with the same request token was returned
    pub replayed: bool,
}

impl From<&order::Model> for PlacedOrder {
    fn from(model: &order::Model) -> Self {
        Self {
            id: model.id,
            order_number: model.order_number.clone(),
            total_amount: model.total_amount,
            replayed: false,
        }
    }
}

/// An order with its lines, ordered by line ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderWithItems {
    /// The order row
    pub order: order::Model,
    /// Its lines
    pub items: Vec<order_item::Model>,
}

impl OrderWithItems {
    /// Parsed status of the order.
    pub fn status(&self) -> Result<OrderStatus> {
        self.order.status.parse()
    }

    /// `sum(price * quantity)` over the lines.
    pub fn items_total(&self) -> Result<Decimal> {
        let lines = self
            .items
            .iter()
            .map(|item| line_total(item.price, item.quantity))
            .collect::<Result<Vec<_>>>()?;
        checked_sum(lines)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }
}

/// Generates an order number such as `ORD-261016-142501-0042`.
///
/// The timestamp part makes numbers readable and roughly sortable; the random suffix
/// makes collisions unlikely but not impossible, so callers still check uniqueness.
#[must_use]
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("ORD-{}-{suffix:04}", now.format("%y%m%d-%H%M%S"))
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Checks the shape of a new order and returns the normalized total.
fn validate_new_order(new_order: &NewOrder) -> Result<Decimal> {
    if new_order.items.is_empty() {
        return Err(Error::validation("An order needs at least one item"));
    }

    let mut lines = Vec::with_capacity(new_order.items.len());
    for item in &new_order.items {
        if item.quantity <= 0 {
            return Err(Error::validation(format!(
                "Quantity for menu item {} must be positive, got {}",
                item.menu_item_id, item.quantity
            )));
        }
        if item.price.is_sign_negative() {
            return Err(Error::InvalidAmount { amount: item.price });
        }
        ensure_in_range(item.price)?;
        lines.push(line_total(item.price, item.quantity)?);
    }

    let computed = ensure_in_range(checked_sum(lines)?)?;
    let total = ensure_in_range(new_order.total_amount)?;
    if computed != total {
        return Err(Error::TotalMismatch {
            expected: computed,
            actual: total,
        });
    }
    Ok(total)
}

async fn find_by_request_token<C>(db: &C, token: &str) -> Result<Option<order::Model>>
where
    C: ConnectionTrait,
{
    Order::find()
        .filter(order::Column::RequestToken.eq(token))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Resolves a failed order insert. When the failure is another submission with the
/// same request token winning the race, that order is returned as a replay.
async fn replay_conflicting_token<C>(
    db: &C,
    request_token: Option<&str>,
    err: DbErr,
) -> Result<PlacedOrder>
where
    C: ConnectionTrait,
{
    if let (Some(SqlErr::UniqueConstraintViolation(_)), Some(token)) =
        (err.sql_err(), request_token)
    {
        if let Some(existing) = find_by_request_token(db, token).await? {
            info!(
                order_number = %existing.order_number,
                "Concurrent duplicate submission, returning existing order"
            );
            return Ok(PlacedOrder {
                replayed: true,
                ..PlacedOrder::from(&existing)
            });
        }
    }
    Err(err.into())
}

async fn allocate_order_number<C>(db: &C, now: DateTime<Utc>) -> Result<String>
where
    C: ConnectionTrait,
{
    for _ in 0..ORDER_NUMBER_ATTEMPTS {
        let candidate = generate_order_number(now);
        let taken = Order::find()
            .filter(order::Column::OrderNumber.eq(candidate.as_str()))
            .count(db)
            .await?
            > 0;
        if !taken {
            return Ok(candidate);
        }
        debug!("Order number {} already taken, drawing another", candidate);
    }
    Err(Error::validation(
        "Could not allocate a unique order number, please retry",
    ))
}

/// Places an order with all of its lines in one transaction.
///
/// Validation happens before any write: at least one line, positive quantities,
/// non-negative prices, every menu item present and available, and
/// `sum(price * quantity) == total_amount`. Unit prices are stored as given, so the
/// order keeps the price the customer saw even if the menu changes later.
///
/// When `request_token` matches an earlier order, that order is returned with
/// `replayed = true` and nothing is written. This also holds when a concurrent
/// submission with the same token commits first and the insert hits the unique index.
#[instrument(skip(db, new_order), fields(items = new_order.items.len()))]
pub async fn create_order(db: &DatabaseConnection, new_order: NewOrder) -> Result<PlacedOrder> {
    let total = validate_new_order(&new_order)?;

    let txn = db.begin().await?;

    if let Some(token) = new_order.request_token.as_deref() {
        if let Some(existing) = find_by_request_token(&txn, token).await? {
            info!(
                order_number = %existing.order_number,
                "Duplicate order submission, returning existing order"
            );
            return Ok(PlacedOrder {
                replayed: true,
                ..PlacedOrder::from(&existing)
            });
        }
    }

    let ids: Vec<i64> = new_order.items.iter().map(|i| i.menu_item_id).collect();
    let menu: HashMap<i64, menu_item::Model> = MenuItem::find()
        .filter(menu_item::Column::Id.is_in(ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    for item in &new_order.items {
        let menu_item = menu
            .get(&item.menu_item_id)
            .ok_or_else(|| Error::MenuItemNotFound {
                id: item.menu_item_id.to_string(),
            })?;
        if !menu_item.is_available {
            return Err(Error::MenuItemUnavailable {
                name: menu_item.name.clone(),
            });
        }
    }

    let now = Utc::now();
    let order_number = allocate_order_number(&txn, now).await?;

    let request_token = new_order.request_token.clone();
    let inserted = order::ActiveModel {
        order_number: Set(order_number),
        customer_name: Set(or_default(new_order.customer_name, DEFAULT_CUSTOMER_NAME)),
        customer_phone: Set(new_order.customer_phone.filter(|p| !p.trim().is_empty())),
        table_number: Set(or_default(new_order.table_number, DEFAULT_TABLE_NUMBER)),
        total_amount: Set(total),
        status: Set(OrderStatus::Pending.to_string()),
        request_token: Set(new_order.request_token),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await;

    let order = match inserted {
        Ok(order) => order,
        Err(err) => {
            txn.rollback().await?;
            return replay_conflicting_token(db, request_token.as_deref(), err).await;
        }
    };

    let lines: Vec<order_item::ActiveModel> = new_order
        .items
        .into_iter()
        .map(|item| {
            // Presence checked above
            let item_name = menu
                .get(&item.menu_item_id)
                .map(|m| m.name.clone())
                .unwrap_or_default();
            order_item::ActiveModel {
                order_id: Set(order.id),
                menu_item_id: Set(Some(item.menu_item_id)),
                item_name: Set(item_name),
                quantity: Set(item.quantity),
                price: Set(normalize(item.price)),
                notes: Set(item.notes.filter(|n| !n.trim().is_empty())),
                ..Default::default()
            }
        })
        .collect();
    OrderItem::insert_many(lines).exec(&txn).await?;

    txn.commit().await?;

    info!(order_number = %order.order_number, total = %order.total_amount, "Order placed");
    Ok(PlacedOrder::from(&order))
}

/// Pairs each order with its lines using one extra query for all of them.
async fn attach_items<C>(db: &C, orders: Vec<order::Model>) -> Result<Vec<OrderWithItems>>
where
    C: ConnectionTrait,
{
    let items = orders.load_many(OrderItem, db).await?;
    Ok(orders
        .into_iter()
        .zip(items)
        .map(|(order, mut items)| {
            items.sort_by_key(|item| item.id);
            OrderWithItems { order, items }
        })
        .collect())
}

/// Loads an order and its lines by ID.
pub async fn get_order<C>(db: &C, order_id: i64) -> Result<Option<OrderWithItems>>
where
    C: ConnectionTrait,
{
    let Some(order) = Order::find_by_id(order_id).one(db).await? else {
        return Ok(None);
    };
    Ok(attach_items(db, vec![order]).await?.pop())
}

/// Loads an order and its lines by order number (case-insensitive).
pub async fn get_order_by_number<C>(db: &C, order_number: &str) -> Result<Option<OrderWithItems>>
where
    C: ConnectionTrait,
{
    let Some(order) = Order::find()
        .filter(order::Column::OrderNumber.eq(order_number.trim().to_ascii_uppercase()))
        .one(db)
        .await?
    else {
        return Ok(None);
    };
    Ok(attach_items(db, vec![order]).await?.pop())
}

/// Orders the kitchen still has to act on, newest first.
pub async fn kitchen_queue<C>(db: &C) -> Result<Vec<OrderWithItems>>
where
    C: ConnectionTrait,
{
    let orders = Order::find()
        .filter(order::Column::Status.is_in(OrderStatus::ACTIVE.map(OrderStatus::as_str)))
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;
    attach_items(db, orders).await
}

/// Orders that are not cancelled and have no payment yet, newest first.
pub async fn unpaid_orders<C>(db: &C) -> Result<Vec<OrderWithItems>>
where
    C: ConnectionTrait,
{
    let orders = Order::find()
        .left_join(Payment)
        .filter(payment::Column::Id.is_null())
        .filter(order::Column::Status.ne(OrderStatus::Cancelled.as_str()))
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;
    attach_items(db, orders).await
}

/// Most recent orders of any status, newest first.
pub async fn recent_orders<C>(db: &C, limit: u64) -> Result<Vec<OrderWithItems>>
where
    C: ConnectionTrait,
{
    let orders = Order::find()
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .limit(limit)
        .all(db)
        .await?;
    attach_items(db, orders).await
}

/// Moves an order to a new status after checking the transition table.
///
/// # Errors
/// - [`Error::OrderNotFound`] if the order does not exist
/// - [`Error::InvalidStatusTransition`] if the move is not allowed (including any
///   move to `completed`, which only a payment may do)
#[instrument(skip(db))]
pub async fn update_order_status(
    db: &DatabaseConnection,
    order_id: i64,
    new_status: OrderStatus,
) -> Result<order::Model> {
    let txn = db.begin().await?;

    let existing = Order::find_by_id(order_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            id: order_id.to_string(),
        })?;

    let current: OrderStatus = existing.status.parse()?;
    if !current.can_transition_to(new_status) {
        warn!(
            order_number = %existing.order_number,
            from = %current,
            to = %new_status,
            "Rejected order status transition"
        );
        return Err(Error::InvalidStatusTransition {
            from: current.to_string(),
            to: new_status.to_string(),
        });
    }

    let mut active: order::ActiveModel = existing.into();
    active.status = Set(new_status.to_string());
    active.updated_at = Set(Utc::now());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    info!(order_number = %updated.order_number, status = %new_status, "Order status updated");
    Ok(updated)
}

/// Cancels an order that is not completed or cancelled yet.
pub async fn cancel_order(db: &DatabaseConnection, order_id: i64) -> Result<order::Model> {
    update_order_status(db, order_id, OrderStatus::Cancelled).await
}

/// Deletes an order together with its payment and lines, all or nothing.
#[instrument(skip(db))]
pub async fn delete_order(db: &DatabaseConnection, order_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            id: order_id.to_string(),
        })?;

    // Children first to satisfy the foreign keys
    Payment::delete_many()
        .filter(payment::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    OrderItem::delete_many()
        .filter(order_item::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    Order::delete_by_id(order_id).exec(&txn).await?;

    txn.commit().await?;

    info!(order_number = %existing.order_number, "Order deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{menu, payment as payments};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn line(menu_item_id: i64, quantity: i32, price: i64) -> NewOrderItem {
        NewOrderItem {
            menu_item_id,
            quantity,
            price: Decimal::from(price),
            notes: None,
        }
    }

    #[test]
    fn test_status_round_trip_names() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert_eq!("  Ready ".parse::<OrderStatus>().unwrap(), OrderStatus::Ready);
        assert!(matches!(
            "served".parse::<OrderStatus>(),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_transition_table() {
        use OrderStatus::{Cancelled, Completed, Confirmed, Pending, Preparing, Ready};

        // Forward, one step at a time
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Preparing));
        assert!(Preparing.can_transition_to(Ready));

        // Skipping and going backwards are rejected
        assert!(!Pending.can_transition_to(Ready));
        assert!(!Ready.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));

        // Cancel from any non-terminal state
        for status in OrderStatus::ACTIVE {
            assert!(status.can_transition_to(Cancelled));
            // Completion only happens through payment
            assert!(!status.can_transition_to(Completed));
        }

        // Terminal states are final
        for to in OrderStatus::ALL {
            assert!(!Completed.can_transition_to(to));
            assert!(!Cancelled.can_transition_to(to));
        }
    }

    #[test]
    fn test_generate_order_number_format() {
        let now = DateTime::parse_from_rfc3339("2026-10-16T14:25:01Z")
            .unwrap()
            .with_timezone(&Utc);
        let number = generate_order_number(now);
        assert!(number.starts_with("ORD-261016-142501-"));
        assert_eq!(number.len(), "ORD-261016-142501-0042".len());
    }

    #[tokio::test]
    async fn test_create_order_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // No items
        let result = create_order(&db, NewOrder::default()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        // Zero quantity
        let result = create_order(
            &db,
            NewOrder {
                items: vec![line(1, 0, 1_000)],
                total_amount: Decimal::ZERO,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        // Negative price
        let result = create_order(
            &db,
            NewOrder {
                items: vec![line(1, 1, -1_000)],
                total_amount: Decimal::from(-1_000),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        // Total does not match the lines
        let result = create_order(
            &db,
            NewOrder {
                items: vec![line(1, 2, 5_000)],
                total_amount: Decimal::from(9_000),
                ..Default::default()
            },
        )
        .await;
        match result.unwrap_err() {
            Error::TotalMismatch { expected, actual } => {
                assert_eq!(expected, Decimal::from(10_000));
                assert_eq!(actual, Decimal::from(9_000));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_total_matches_items() -> Result<()> {
        let db = setup_test_db().await?;
        let nasi = create_test_menu_item(&db, "Nasi Goreng Spesial", 25_000).await?;
        let ayam = create_test_menu_item(&db, "Ayam Bakar Madu", 30_000).await?;

        let placed = create_order(
            &db,
            NewOrder {
                customer_name: Some("Budi".to_string()),
                table_number: Some("7".to_string()),
                items: vec![line(nasi.id, 1, 25_000), line(ayam.id, 1, 30_000)],
                total_amount: Decimal::from(55_000),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(placed.total_amount, Decimal::from(55_000));
        assert!(placed.order_number.starts_with("ORD-"));
        assert!(!placed.replayed);

        let stored = get_order(&db, placed.id).await?.unwrap();
        assert_eq!(stored.items.len(), 2);
        assert_eq!(stored.items_total()?, stored.order.total_amount);
        assert_eq!(stored.status()?, OrderStatus::Pending);
        assert_eq!(stored.order.customer_name, "Budi");
        assert_eq!(stored.order.table_number, "7");
        assert_eq!(stored.items[0].item_name, "Nasi Goreng Spesial");

        let by_number = get_order_by_number(&db, &placed.order_number.to_lowercase())
            .await?
            .unwrap();
        assert_eq!(by_number, stored);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_defaults_for_blank_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let teh = create_test_menu_item(&db, "Es Teh", 5_000).await?;

        let placed = create_order(
            &db,
            NewOrder {
                customer_name: Some("   ".to_string()),
                items: vec![line(teh.id, 3, 5_000)],
                total_amount: Decimal::from(15_000),
                ..Default::default()
            },
        )
        .await?;

        let stored = get_order(&db, placed.id).await?.unwrap();
        assert_eq!(stored.order.customer_name, DEFAULT_CUSTOMER_NAME);
        assert_eq!(stored.order.table_number, DEFAULT_TABLE_NUMBER);
        assert_eq!(stored.unit_count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_rejects_unknown_or_unavailable_items() -> Result<()> {
        let db = setup_test_db().await?;
        let teh = create_test_menu_item(&db, "Es Teh", 5_000).await?;

        let result = create_order(
            &db,
            NewOrder {
                items: vec![line(999, 1, 5_000)],
                total_amount: Decimal::from(5_000),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::MenuItemNotFound { .. }));

        menu::set_availability(&db, teh.id, false).await?;
        let result = create_order(
            &db,
            NewOrder {
                items: vec![line(teh.id, 1, 5_000)],
                total_amount: Decimal::from(5_000),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::MenuItemUnavailable { .. }));

        // Nothing was written by either attempt
        assert_eq!(Order::find().count(&db).await?, 0);
        assert_eq!(OrderItem::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_request_token_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let teh = create_test_menu_item(&db, "Es Teh", 5_000).await?;

        let request = NewOrder {
            items: vec![line(teh.id, 1, 5_000)],
            total_amount: Decimal::from(5_000),
            request_token: Some("checkout-abc".to_string()),
            ..Default::default()
        };

        let first = create_order(&db, request.clone()).await?;
        let second = create_order(&db, request).await?;

        assert!(!first.replayed);
        assert!(second.replayed);
        assert_eq!(first.id, second.id);
        assert_eq!(first.order_number, second.order_number);
        assert_eq!(Order::find().count(&db).await?, 1);
        assert_eq!(OrderItem::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_rejects_out_of_range_amounts() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let huge: Decimal = "50000000000000000000000000000".parse().unwrap();

        // Would overflow Decimal when multiplied
        let result = create_order(
            &db,
            NewOrder {
                items: vec![NewOrderItem {
                    menu_item_id: 1,
                    quantity: 2,
                    price: huge,
                    notes: None,
                }],
                total_amount: huge,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        // Each line fits, the total does not
        let result = create_order(
            &db,
            NewOrder {
                items: vec![line(1, 3, 50_000_000)],
                total_amount: Decimal::from(150_000_000),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_amounts_round_trip_exactly() -> Result<()> {
        let db = setup_test_db().await?;
        let item = menu::create_menu_item(
            &db,
            menu::NewMenuItem {
                name: "Tumpeng".to_string(),
                price: "12,345,678.91".to_string(),
                is_available: true,
                ..Default::default()
            },
        )
        .await?;
        let price = Decimal::new(1_234_567_891, 2);
        assert_eq!(item.price, price);

        let placed = create_order(
            &db,
            NewOrder {
                items: vec![NewOrderItem {
                    menu_item_id: item.id,
                    quantity: 8,
                    price,
                    notes: None,
                }],
                total_amount: Decimal::new(9_876_543_128, 2),
                ..Default::default()
            },
        )
        .await?;

        let stored = get_order(&db, placed.id).await?.unwrap();
        assert_eq!(stored.order.total_amount, Decimal::new(9_876_543_128, 2));
        assert_eq!(stored.items[0].price, price);
        assert_eq!(
            menu::get_menu_item(&db, item.id).await?.unwrap().price,
            price
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_token_conflict_on_insert_replays_winner() -> Result<()> {
        let db = setup_test_db().await?;
        let teh = create_test_menu_item(&db, "Es Teh", 5_000).await?;
        let winner = create_order(
            &db,
            NewOrder {
                items: vec![line(teh.id, 1, 5_000)],
                total_amount: Decimal::from(5_000),
                request_token: Some("checkout-race".to_string()),
                ..Default::default()
            },
        )
        .await?;

        // A second insert with the same token, as a racing submission would make
        let now = Utc::now();
        let conflict = order::ActiveModel {
            order_number: Set("ORD-RACE".to_string()),
            customer_name: Set(DEFAULT_CUSTOMER_NAME.to_string()),
            customer_phone: Set(None),
            table_number: Set(DEFAULT_TABLE_NUMBER.to_string()),
            total_amount: Set(Decimal::from(5_000)),
            status: Set(OrderStatus::Pending.to_string()),
            request_token: Set(Some("checkout-race".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap_err();

        let replayed = replay_conflicting_token(&db, Some("checkout-race"), conflict).await?;
        assert!(replayed.replayed);
        assert_eq!(replayed.id, winner.id);
        assert_eq!(replayed.order_number, winner.order_number);
        assert_eq!(Order::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_other_insert_failures_are_not_replayed() -> Result<()> {
        let db = setup_test_db().await?;
        let teh = create_test_menu_item(&db, "Es Teh", 5_000).await?;
        let placed = place_test_order(&db, &[(teh.id, 1, 5_000)]).await?;

        // Same order number, no token: a plain unique violation
        let now = Utc::now();
        let conflict = order::ActiveModel {
            order_number: Set(placed.order_number.clone()),
            customer_name: Set(DEFAULT_CUSTOMER_NAME.to_string()),
            customer_phone: Set(None),
            table_number: Set(DEFAULT_TABLE_NUMBER.to_string()),
            total_amount: Set(Decimal::from(5_000)),
            status: Set(OrderStatus::Pending.to_string()),
            request_token: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap_err();

        let result = replay_conflicting_token(&db, None, conflict).await;
        assert!(matches!(result.unwrap_err(), Error::Database(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_order_status_follows_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;
        let teh = create_test_menu_item(&db, "Es Teh", 5_000).await?;
        let placed = place_test_order(&db, &[(teh.id, 1, 5_000)]).await?;

        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ] {
            let updated = update_order_status(&db, placed.id, status).await?;
            assert_eq!(updated.status, status.as_str());
            assert!(updated.updated_at >= updated.created_at);
        }

        // Completion is reserved for payments
        let result = update_order_status(&db, placed.id, OrderStatus::Completed).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidStatusTransition { .. }
        ));

        let result = update_order_status(&db, 999, OrderStatus::Confirmed).await;
        assert!(matches!(result.unwrap_err(), Error::OrderNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_illegal_transition_leaves_order_unchanged() -> Result<()> {
        let db = setup_test_db().await?;
        let teh = create_test_menu_item(&db, "Es Teh", 5_000).await?;
        let placed = place_test_order(&db, &[(teh.id, 1, 5_000)]).await?;

        let result = update_order_status(&db, placed.id, OrderStatus::Ready).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidStatusTransition { .. }
        ));

        let stored = get_order(&db, placed.id).await?.unwrap();
        assert_eq!(stored.status()?, OrderStatus::Pending);

        // Cancelled orders stay cancelled
        cancel_order(&db, placed.id).await?;
        let result = update_order_status(&db, placed.id, OrderStatus::Confirmed).await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_kitchen_queue_and_unpaid_orders() -> Result<()> {
        let db = setup_test_db().await?;
        let teh = create_test_menu_item(&db, "Es Teh", 5_000).await?;

        let paid = place_test_order(&db, &[(teh.id, 1, 5_000)]).await?;
        let cancelled = place_test_order(&db, &[(teh.id, 2, 5_000)]).await?;
        let open = place_test_order(&db, &[(teh.id, 3, 5_000)]).await?;

        payments::process_payment(
            &db,
            paid.id,
            Decimal::from(5_000),
            "cash",
            Decimal::from(5_000),
        )
        .await?;
        cancel_order(&db, cancelled.id).await?;

        let queue = kitchen_queue(&db).await?;
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].order.id, open.id);
        assert_eq!(queue[0].items.len(), 1);

        let unpaid = unpaid_orders(&db).await?;
        assert_eq!(unpaid.len(), 1);
        assert_eq!(unpaid[0].order.id, open.id);

        let recent = recent_orders(&db, 2).await?;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].order.id, open.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_order_removes_payment_and_items() -> Result<()> {
        let db = setup_test_db().await?;
        let teh = create_test_menu_item(&db, "Es Teh", 5_000).await?;
        let placed = place_test_order(&db, &[(teh.id, 2, 5_000)]).await?;
        payments::process_payment(
            &db,
            placed.id,
            Decimal::from(20_000),
            "cash",
            Decimal::from(10_000),
        )
        .await?;

        delete_order(&db, placed.id).await?;

        assert!(get_order(&db, placed.id).await?.is_none());
        assert_eq!(OrderItem::find().count(&db).await?, 0);
        assert_eq!(Payment::find().count(&db).await?, 0);

        let result = delete_order(&db, placed.id).await;
        assert!(matches!(result.unwrap_err(), Error::OrderNotFound { .. }));
        Ok(())
    }
}
