//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod ingredient;
pub mod menu_item;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod stock_transaction;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use ingredient::{Column as IngredientColumn, Entity as Ingredient, Model as IngredientModel};
pub use menu_item::{Column as MenuItemColumn, Entity as MenuItem, Model as MenuItemModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use stock_transaction::{
    Column as StockTransactionColumn, Entity as StockTransaction, Model as StockTransactionModel,
};
