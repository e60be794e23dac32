/// Database configuration and connection management
pub mod database;

/// Settings and seed data loading from config.toml
pub mod settings;
