//! Core business logic - framework-agnostic restaurant operations.
//!
//! Nothing in here knows about Discord. Every function takes a database connection
//! and returns typed results, so the same operations can back the chat console, a web
//! API, or tests.

/// Dashboard rollups
pub mod dashboard;
/// Categories, menu items and the catalog view
pub mod menu;
/// Decimal money and quantity helpers
pub mod money;
/// Order placement and lifecycle
pub mod order;
/// Payments against orders
pub mod payment;
/// Plain-text formatting of orders, receipts and stock
pub mod report;
/// Start-up seeding from config.toml
pub mod seed;
/// Ingredients and stock movements
pub mod stock;
