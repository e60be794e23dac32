//! Stock ledger - ingredients and their movement log.
//!
//! Every movement is appended to `stock_transactions` and applied to the ingredient's
//! running `current_stock` in the same database transaction. Balances may go negative;
//! a deficit is recorded rather than refused.

use crate::{
    core::money::{ensure_in_range, normalize},
    entities::{Ingredient, StockTransaction, ingredient, stock_transaction},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{
    QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{info, instrument};

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockTransactionType {
    /// Delivery or purchase; adds the quantity
    In,
    /// Usage or waste; subtracts the quantity
    Out,
    /// Stock-take correction; applies a signed delta
    Adjustment,
}

impl StockTransactionType {
    /// All types, in display order.
    pub const ALL: [Self; 3] = [Self::In, Self::Out, Self::Adjustment];

    /// Name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Adjustment => "adjustment",
        }
    }

    /// Signed change this movement makes to the balance.
    #[must_use]
    pub fn delta(self, quantity: Decimal) -> Decimal {
        match self {
            Self::In | Self::Adjustment => quantity,
            Self::Out => -quantity,
        }
    }

    fn validate_quantity(self, quantity: Decimal) -> Result<()> {
        match self {
            Self::In | Self::Out if quantity <= Decimal::ZERO => {
                Err(Error::InvalidAmount { amount: quantity })
            }
            Self::Adjustment if quantity.is_zero() => Err(Error::InvalidAmount { amount: quantity }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for StockTransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockTransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| Error::validation(format!("Unknown stock transaction type '{s}'")))
    }
}

/// An ingredient with its low-stock flag evaluated at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientStatus {
    /// The ingredient row
    pub ingredient: ingredient::Model,
    /// `current_stock <= min_stock`
    pub low_stock: bool,
}

impl From<ingredient::Model> for IngredientStatus {
    fn from(ingredient: ingredient::Model) -> Self {
        Self {
            low_stock: is_low_stock(&ingredient),
            ingredient,
        }
    }
}

/// Result of [`add_stock_transaction`]: the log row and the ingredient after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    /// Appended log row
    pub transaction: stock_transaction::Model,
    /// Ingredient with its new balance
    pub ingredient: ingredient::Model,
}

/// A log row joined with its ingredient for history screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockTransactionEntry {
    /// The log row
    pub transaction: stock_transaction::Model,
    /// Its ingredient, if it still exists
    pub ingredient: Option<ingredient::Model>,
}

/// Returns true when the balance is at or below the threshold.
#[must_use]
pub fn is_low_stock(ingredient: &ingredient::Model) -> bool {
    ingredient.current_stock <= ingredient.min_stock
}

/// Creates an ingredient with a zero balance.
///
/// # Errors
/// - [`Error::Validation`] if the name or unit is blank
/// - [`Error::InvalidAmount`] if the cost or threshold is negative or too large
pub async fn add_ingredient(
    db: &DatabaseConnection,
    name: String,
    unit: String,
    cost_per_unit: Decimal,
    min_stock: Decimal,
) -> Result<ingredient::Model> {
    let name = name.trim().to_string();
    let unit = unit.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("Ingredient name cannot be empty"));
    }
    if unit.is_empty() {
        return Err(Error::validation("Ingredient unit cannot be empty"));
    }
    for amount in [cost_per_unit, min_stock] {
        if amount < Decimal::ZERO {
            return Err(Error::InvalidAmount { amount });
        }
        ensure_in_range(amount)?;
    }

    let ingredient = ingredient::ActiveModel {
        name: Set(name),
        unit: Set(unit),
        current_stock: Set(Decimal::ZERO),
        min_stock: Set(normalize(min_stock)),
        cost_per_unit: Set(normalize(cost_per_unit)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(ingredient = %ingredient.name, "Ingredient added");
    Ok(ingredient)
}

/// Records a stock movement and applies it to the ingredient's balance.
///
/// `in` and `out` need a positive quantity; `adjustment` takes any non-zero signed
/// quantity and adds it. The new balance is computed in decimal arithmetic from the
/// row read under lock, so the log and the balance always agree. A movement that
/// would push the balance past the stored precision is rejected before any write.
#[instrument(skip(db))]
pub async fn add_stock_transaction(
    db: &DatabaseConnection,
    ingredient_id: i64,
    transaction_type: StockTransactionType,
    quantity: Decimal,
    reason: Option<String>,
) -> Result<StockMovement> {
    let quantity = ensure_in_range(quantity)?;
    transaction_type.validate_quantity(quantity)?;

    let txn = db.begin().await?;

    let existing = Ingredient::find_by_id(ingredient_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| Error::IngredientNotFound {
            id: ingredient_id.to_string(),
        })?;

    let new_balance = existing
        .current_stock
        .checked_add(transaction_type.delta(quantity))
        .ok_or(Error::InvalidAmount { amount: quantity })
        .and_then(ensure_in_range)?;

    let transaction = stock_transaction::ActiveModel {
        ingredient_id: Set(ingredient_id),
        transaction_type: Set(transaction_type.to_string()),
        quantity: Set(quantity),
        reason: Set(reason.filter(|r| !r.trim().is_empty())),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut active: ingredient::ActiveModel = existing.into();
    active.current_stock = Set(new_balance);
    let ingredient = active.update(&txn).await?;

    txn.commit().await?;

    info!(
        ingredient = %ingredient.name,
        kind = %transaction_type,
        %quantity,
        balance = %ingredient.current_stock,
        "Stock movement recorded"
    );
    Ok(StockMovement {
        transaction,
        ingredient,
    })
}

/// Finds an ingredient by its ID.
pub async fn get_ingredient<C>(db: &C, ingredient_id: i64) -> Result<Option<ingredient::Model>>
where
    C: ConnectionTrait,
{
    Ingredient::find_by_id(ingredient_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an ingredient by exact name.
pub async fn get_ingredient_by_name<C>(db: &C, name: &str) -> Result<Option<ingredient::Model>>
where
    C: ConnectionTrait,
{
    Ingredient::find()
        .filter(ingredient::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All ingredients by name, each with its low-stock flag.
pub async fn list_ingredients<C>(db: &C) -> Result<Vec<IngredientStatus>>
where
    C: ConnectionTrait,
{
    let ingredients = Ingredient::find()
        .order_by_asc(ingredient::Column::Name)
        .all(db)
        .await?;
    Ok(ingredients.into_iter().map(IngredientStatus::from).collect())
}

/// Ingredients at or below their threshold, by name.
pub async fn low_stock_ingredients<C>(db: &C) -> Result<Vec<ingredient::Model>>
where
    C: ConnectionTrait,
{
    Ingredient::find()
        .filter(Expr::col(ingredient::Column::CurrentStock).lte(Expr::col(ingredient::Column::MinStock)))
        .order_by_asc(ingredient::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Number of ingredients at or below their threshold.
pub async fn count_low_stock<C>(db: &C) -> Result<u64>
where
    C: ConnectionTrait,
{
    Ingredient::find()
        .filter(Expr::col(ingredient::Column::CurrentStock).lte(Expr::col(ingredient::Column::MinStock)))
        .count(db)
        .await
        .map_err(Into::into)
}

/// The latest movements, newest first, optionally for one ingredient only.
pub async fn recent_stock_transactions<C>(
    db: &C,
    ingredient_id: Option<i64>,
    limit: u64,
) -> Result<Vec<StockTransactionEntry>>
where
    C: ConnectionTrait,
{
    let mut query = StockTransaction::find();
    if let Some(id) = ingredient_id {
        query = query.filter(stock_transaction::Column::IngredientId.eq(id));
    }
    let rows = query
        .find_also_related(Ingredient)
        .order_by_desc(stock_transaction::Column::CreatedAt)
        .order_by_desc(stock_transaction::Column::Id)
        .limit(limit)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(transaction, ingredient)| StockTransactionEntry {
            transaction,
            ingredient,
        })
        .collect())
}
