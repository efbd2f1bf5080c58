//! Core inventory logic for Chemstock.
//!
//! This crate contains pure business logic with no web or database
//! dependencies: operation validation, balance replay, and period reports.

pub mod inventory;
