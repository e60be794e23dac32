//! Stock transaction entity - Append-only log of ingredient movements.
//!
//! `transaction_type` is one of `"in"`, `"out"` or `"adjustment"`. For adjustments the
//! quantity is signed; for the other two it is always positive.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Ingredient whose balance moved
    pub ingredient_id: i64,
    /// Type of movement: `"in"`, `"out"` or `"adjustment"`
    pub transaction_type: String,
    /// Quantity moved
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub quantity: Decimal,
    /// Optional reason (e.g., "weekly delivery", "spoiled")
    pub reason: Option<String>,
    /// When the movement was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `StockTransaction` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one ingredient
    #[sea_orm(
        belongs_to = "super::ingredient::Entity",
        from = "Column::IngredientId",
        to = "super::ingredient::Column::Id"
    )]
    Ingredient,
}

impl Related<super::ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
