//! Category entity - Groups menu items for display.
//!
//! Deleting a category detaches its menu items (their `category_id` becomes NULL);
//! the items themselves are kept.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Main Course", "Drinks")
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// When the category was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many menu items
    #[sea_orm(has_many = "super::menu_item::Entity")]
    MenuItems,
}

impl Related<super::menu_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
