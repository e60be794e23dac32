//! Ingredient entity - A stock-tracked raw input.
//!
//! `current_stock` is a running balance maintained by
//! [`crate::core::stock::add_stock_transaction`]; it is not recomputed from history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ingredient database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    /// Unique identifier for the ingredient
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Ingredient name (e.g., "Rice")
    pub name: String,
    /// Unit of measure (e.g., "kg", "pcs")
    pub unit: String,
    /// Current balance, may be negative when a deficit is recorded
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub current_stock: Decimal,
    /// Threshold at or below which the ingredient counts as low stock
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub min_stock: Decimal,
    /// Purchase cost per unit
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub cost_per_unit: Decimal,
}

/// Defines relationships between Ingredient and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One ingredient has many stock transactions
    #[sea_orm(has_many = "super::stock_transaction::Entity")]
    StockTransactions,
}

impl Related<super::stock_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
