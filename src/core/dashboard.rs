//! Dashboard rollups. Read only.

use crate::{
    core::{
        money::checked_sum,
        order::{OrderStatus, OrderWithItems, recent_orders},
        stock::count_low_stock,
    },
    entities::{Order, order},
    errors::Result,
};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use sea_orm::{QuerySelect, prelude::*};
use tracing::debug;

/// Figures shown on the staff dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    /// Local day the figures are for
    pub day: NaiveDate,
    /// Orders placed during the day, any status
    pub orders_today: u64,
    /// Sum of totals of orders placed during the day and completed
    pub revenue_today: Decimal,
    /// Orders in a non-terminal status, regardless of day
    pub active_orders: u64,
    /// Ingredients at or below their threshold
    pub low_stock_count: u64,
    /// Most recent orders, newest first
    pub recent_orders: Vec<OrderWithItems>,
}

/// UTC instants bounding a local calendar day: `[start, end)`.
#[must_use]
pub fn day_bounds(day: NaiveDate, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let local_midnight = day.and_time(NaiveTime::MIN);
    let start = Utc.from_utc_datetime(
        &(local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()))),
    );
    (start, start + Duration::days(1))
}

/// Builds a fixed offset from whole hours, clamped to the valid range.
#[must_use]
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours.clamp(-23, 23) * 3600).unwrap_or_else(|| Utc.fix())
}

/// The local date right now at `offset`.
#[must_use]
pub fn today(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// Computes the dashboard for one local day.
pub async fn dashboard_stats<C>(
    db: &C,
    day: NaiveDate,
    offset: FixedOffset,
    recent_limit: u64,
) -> Result<DashboardStats>
where
    C: ConnectionTrait,
{
    let (start, end) = day_bounds(day, offset);
    debug!(%day, %start, %end, "Computing dashboard");

    let in_day = order::Column::CreatedAt
        .gte(start)
        .and(order::Column::CreatedAt.lt(end));

    let orders_today = Order::find().filter(in_day.clone()).count(db).await?;

    let revenue_today = checked_sum(
        Order::find()
            .select_only()
            .column(order::Column::TotalAmount)
            .filter(in_day)
            .filter(order::Column::Status.eq(OrderStatus::Completed.as_str()))
            .into_tuple::<Decimal>()
            .all(db)
            .await?,
    )?;

    let active_orders = Order::find()
        .filter(order::Column::Status.is_in(OrderStatus::ACTIVE.map(OrderStatus::as_str)))
        .count(db)
        .await?;

    Ok(DashboardStats {
        day,
        orders_today,
        revenue_today,
        active_orders,
        low_stock_count: count_low_stock(db).await?,
        recent_orders: recent_orders(db, recent_limit).await?,
    })
}
