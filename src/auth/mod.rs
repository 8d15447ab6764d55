//! Authentication module
//!
//! This module provides authentication functionality including:
//! - Login and the mandatory first-login password change
//! - Admin-only account management
//! - JWT session tokens and bcrypt password hashing
//! - Authentication and role middleware

pub mod jwt;
pub mod password;
pub mod service;
pub mod handlers;
pub mod middleware;
pub mod models;

pub use jwt::{Claims, TokenIssuer};
pub use password::PasswordHasher;
pub use service::AuthService;
pub use middleware::{authenticate, authorize, AuthUser, ADMIN_ONLY, ANY_ROLE};
