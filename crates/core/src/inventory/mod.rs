//! Grouped-operation inventory logic.
//!
//! This module implements the core inventory functionality:
//! - Operation validation and materialization into ledger lines
//! - Full-history balance replay
//! - Affected (facility, chemical) pair derivation
//! - Period report arithmetic
//! - Error types for inventory operations

pub mod builder;
pub mod error;
pub mod replay;
pub mod report;
pub mod types;

#[cfg(test)]
mod replay_props;

pub use builder::validate_operation;
pub use error::InventoryError;
pub use replay::{Pair, affected_pairs, replay_balance};
pub use report::PeriodReport;
pub use types::{
    ActingUser, LedgerRow, OperationInput, OperationItemInput, ResolvedLine, ResolvedOperation,
    TransactionType, normalize_facility_ref,
};
