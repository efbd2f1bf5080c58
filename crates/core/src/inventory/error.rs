//! Inventory error types for validation and lookup failures.
//!
//! All variants are caller-input errors; none is fatal to the process.
//! Any of them raised inside a store transaction aborts the whole unit.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while validating or applying inventory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    // ========== Validation Errors ==========
    /// A required field was not supplied.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The operation type and facility pair do not match.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A line item quantity was unparseable or not strictly positive.
    #[error("Quantity \"{0}\" must be a positive number")]
    InvalidQuantity(String),

    // ========== Lookup Errors ==========
    /// Referenced facility does not exist.
    #[error("Facility not found: {0}")]
    FacilityNotFound(Uuid),

    /// A facility reference was neither absent nor a valid id.
    #[error("Facility not found: {0}")]
    UnknownFacilityRef(String),

    /// Referenced chemical does not exist.
    #[error("Chemical not found: {0}")]
    ChemicalNotFound(Uuid),

    /// No rows exist for the given operation identifier.
    #[error("Operation not found: {0}")]
    OperationNotFound(Uuid),

    // ========== Policy Errors ==========
    /// The acting user's role forbids this operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidOperation(_) => "INVALID_OPERATION",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::FacilityNotFound(_)
            | Self::UnknownFacilityRef(_)
            | Self::ChemicalNotFound(_)
            | Self::OperationNotFound(_) => "NOT_FOUND",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::MissingField(_) | Self::InvalidOperation(_) | Self::InvalidQuantity(_) => 400,
            Self::FacilityNotFound(_)
            | Self::UnknownFacilityRef(_)
            | Self::ChemicalNotFound(_)
            | Self::OperationNotFound(_) => 404,
            Self::PermissionDenied(_) => 403,
        }
    }
}
