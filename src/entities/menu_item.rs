//! Menu item entity - Something a customer can order.
//!
//! Prices are stored with two decimal places. `image_url` is an opaque reference to
//! an external asset host and is never interpreted here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Menu item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    /// Unique identifier for the menu item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name shown on the menu (e.g., "Nasi Goreng Spesial")
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Current selling price
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    /// Opaque image URL
    pub image_url: Option<String>,
    /// Category this item is listed under, if any
    pub category_id: Option<i64>,
    /// Whether customers can currently order this item
    pub is_available: bool,
    /// Preparation time in minutes
    pub preparation_time: Option<i32>,
    /// When the item was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `MenuItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each menu item optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One menu item is referenced by many order items
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
