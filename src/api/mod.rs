//! REST API module
//!
//! This module provides the HTTP server and REST API endpoints including:
//! - API routing and request handling
//! - Trace id and security header middleware
//! - Request/response models for the inventory collections

pub mod server;
pub mod routes;
pub mod middleware;
pub mod handlers;
pub mod models;

pub use server::ApiServer;
pub use handlers::AppState;
pub use middleware::{trace_id_middleware, TRACE_ID_HEADER};
