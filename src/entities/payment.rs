//! Payment entity - Money received against one order.
//!
//! `order_id` is unique: an order is paid at most once, and the database rejects a
//! second payment even when two cashiers race.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order being paid
    #[sea_orm(unique)]
    pub order_id: i64,
    /// Amount handed over by the customer
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount_paid: Decimal,
    /// Payment method (e.g., `"cash"`, `"qris"`, `"card"`)
    pub payment_method: String,
    /// `amount_paid - total_amount`, never negative
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub change_amount: Decimal,
    /// When the payment was recorded
    pub paid_at: DateTimeUtc,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
