//! Order entity - A customer's placed request for menu items.
//!
//! `status` holds one of the lowercase [`crate::core::order::OrderStatus`] names.
//! `order_number` is unique and never changes once assigned. `request_token` is an
//! optional client-supplied key that makes order placement idempotent.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable order number (e.g., `ORD-261016-142501-0042`)
    #[sea_orm(unique)]
    pub order_number: String,
    /// Customer name, `"Guest"` when not given
    pub customer_name: String,
    /// Optional customer phone number
    pub customer_phone: Option<String>,
    /// Table number, `"Takeaway"` when not given
    pub table_number: String,
    /// Sum of `price * quantity` over the order's items
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_amount: Decimal,
    /// Lifecycle status
    pub status: String,
    /// Idempotency key supplied by the client, if any
    #[sea_orm(unique)]
    pub request_token: Option<String>,
    /// When the order was placed
    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,
    /// When the order was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many items
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
    /// One order has at most one payment
    #[sea_orm(has_one = "super::payment::Entity")]
    Payment,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
