//! Payment recording - settles an order and completes it.
//!
//! A payment row exists if and only if its order is `completed`. Both are written in
//! the same database transaction, and the unique index on `payments.order_id` makes a
//! second payment for the same order fail even when two cashiers race.

use crate::{
    core::{money::ensure_in_range, order::OrderStatus},
    entities::{Order, Payment, order, payment},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QuerySelect, Set, SqlErr, TransactionTrait, prelude::*};
use tracing::{info, instrument, warn};

/// Records a payment for an order and marks it `completed`.
///
/// `total_amount` is the total the cashier is collecting. It must match the stored
/// order total so a stale screen cannot settle an order for the wrong amount.
///
/// # Errors
/// - [`Error::Validation`] if `payment_method` is blank
/// - [`Error::InvalidAmount`] if either amount is negative or exceeds the stored
///   precision
/// - [`Error::InsufficientPayment`] if `amount_paid < total_amount`
/// - [`Error::OrderNotFound`] if the order does not exist
/// - [`Error::TotalMismatch`] if `total_amount` differs from the stored total
/// - [`Error::OrderClosed`] if the order is cancelled
/// - [`Error::AlreadyPaid`] if the order already has a payment
#[instrument(skip(db))]
pub async fn process_payment(
    db: &DatabaseConnection,
    order_id: i64,
    amount_paid: Decimal,
    payment_method: &str,
    total_amount: Decimal,
) -> Result<payment::Model> {
    let payment_method = payment_method.trim().to_ascii_lowercase();
    if payment_method.is_empty() {
        return Err(Error::validation("Payment method cannot be empty"));
    }

    let amount_paid = ensure_in_range(amount_paid)?;
    let total_amount = ensure_in_range(total_amount)?;
    for amount in [amount_paid, total_amount] {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(Error::InvalidAmount { amount });
        }
    }
    if amount_paid < total_amount {
        return Err(Error::InsufficientPayment {
            total: total_amount,
            paid: amount_paid,
        });
    }

    let txn = db.begin().await?;

    let existing = Order::find_by_id(order_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            id: order_id.to_string(),
        })?;

    let stored_total = ensure_in_range(existing.total_amount)?;
    if stored_total != total_amount {
        return Err(Error::TotalMismatch {
            expected: stored_total,
            actual: total_amount,
        });
    }

    match existing.status.parse::<OrderStatus>()? {
        OrderStatus::Cancelled => {
            return Err(Error::OrderClosed {
                order_number: existing.order_number,
                status: existing.status,
            });
        }
        OrderStatus::Completed => {
            return Err(Error::AlreadyPaid {
                order_number: existing.order_number,
            });
        }
        _ => {}
    }

    let now = Utc::now();
    let inserted = payment::ActiveModel {
        order_id: Set(order_id),
        amount_paid: Set(amount_paid),
        payment_method: Set(payment_method),
        change_amount: Set(amount_paid - total_amount),
        paid_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await;

    let payment = match inserted {
        Ok(payment) => payment,
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            warn!(order_number = %existing.order_number, "Duplicate payment rejected");
            txn.rollback().await?;
            return Err(Error::AlreadyPaid {
                order_number: existing.order_number,
            });
        }
        Err(err) => return Err(err.into()),
    };

    let order_number = existing.order_number.clone();
    let mut active: order::ActiveModel = existing.into();
    active.status = Set(OrderStatus::Completed.to_string());
    active.updated_at = Set(now);
    active.update(&txn).await?;

    txn.commit().await?;

    info!(
        order_number = %order_number,
        paid = %payment.amount_paid,
        change = %payment.change_amount,
        method = %payment.payment_method,
        "Payment recorded"
    );
    Ok(payment)
}

/// Returns the payment for an order, if it has been paid.
pub async fn get_payment_for_order<C>(db: &C, order_id: i64) -> Result<Option<payment::Model>>
where
    C: ConnectionTrait,
{
    Payment::find()
        .filter(payment::Column::OrderId.eq(order_id))
        .one(db)
        .await
        .map_err(Into::into)
}
