//! Shared domain types.

pub mod quantity;
pub mod role;

pub use role::Role;
