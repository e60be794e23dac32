//! Discord command implementations organized by area of the restaurant.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Cashier commands
pub mod cashier;

/// Dashboard command
pub mod dashboard;

/// General utility commands
pub mod general;

/// Kitchen queue and order status commands
pub mod kitchen;

/// Menu browsing and management commands
pub mod menu;

/// Order placement and lookup commands
pub mod order;

/// Ingredient and stock commands
pub mod stock;

// Export commands
pub use cashier::*;
pub use dashboard::*;
pub use general::*;
pub use kitchen::*;
pub use menu::*;
pub use order::*;
pub use stock::*;
