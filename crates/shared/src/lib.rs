//! Shared types, claims, and configuration for Chemstock.
//!
//! This crate provides common types used across all other crates:
//! - Fixed-precision quantity helpers
//! - User roles and JWT claims (the identity interface)
//! - Application configuration management

pub mod auth;
pub mod config;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use types::{Role, quantity};
