//! Unified error type for `RestoBuddy`.
//!
//! Domain failures use struct variants so callers (and tests) can match on the
//! offending values; infrastructure failures are converted with `#[from]`.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("Invalid price '{input}': {reason}")]
    InvalidPrice { input: String, reason: String },

    #[error("Insufficient payment: total is {total}, paid {paid}")]
    InsufficientPayment { total: Decimal, paid: Decimal },

    #[error("Order total mismatch: expected {expected}, got {actual}")]
    TotalMismatch { expected: Decimal, actual: Decimal },

    #[error("Cannot move order from '{from}' to '{to}'")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Order not found: {id}")]
    OrderNotFound { id: String },

    #[error("Order {order_number} is {status} and cannot be changed")]
    OrderClosed {
        order_number: String,
        status: String,
    },

    #[error("Order {order_number} has already been paid")]
    AlreadyPaid { order_number: String },

    #[error("Menu item not found: {id}")]
    MenuItemNotFound { id: String },

    #[error("Menu item '{name}' is not available")]
    MenuItemUnavailable { name: String },

    #[error("Category not found: {id}")]
    CategoryNotFound { id: String },

    #[error("Ingredient not found: {id}")]
    IngredientNotFound { id: String },

    #[error("Rate limit exceeded, try again in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),

    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for errors caused by caller input rather than infrastructure.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_)
                | Self::Io(_)
                | Self::EnvVar(_)
                | Self::Fmt(_)
                | Self::IntConversion(_)
                | Self::FrameworkError(_)
                | Self::Config { .. }
        )
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
