//! StarPlus Inventory Backend Library
//!
//! This library provides the core functionality for the StarPlus inventory
//! backend, including user accounts, site and equipment catalogs, dashboard
//! cards and the REST API that serves them.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use api::{ApiServer, AppState};
pub use crate::core::{Config, InventoryError};
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
