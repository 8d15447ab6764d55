//! Core application layer
//!
//! This module provides:
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system
//! - Equipment price quotes

pub mod config;
pub mod logging;
pub mod error;
pub mod quote;

pub use config::Config;
pub use logging::Logger;
pub use error::{InventoryError, ErrorResponse, Result};
pub use quote::{Quote, QuoteLine, QuoteService};
