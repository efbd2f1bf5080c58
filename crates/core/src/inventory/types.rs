//! Inventory domain types for operation creation and replay.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chemstock_shared::types::Role;

use super::error::InventoryError;

/// Movement direction of an operation.
///
/// Quantity is always positive; direction is encoded by which facility
/// references are populated:
/// - `Add` stocks `to_facility`
/// - `Consume` draws down `from_facility`
/// - `Transfer` moves between `from_facility` and `to_facility`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Incoming stock.
    Add,
    /// Stock written off at a facility.
    Consume,
    /// Stock moved between two facilities.
    Transfer,
}

impl TransactionType {
    /// Returns the lowercase wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Consume => "consume",
            Self::Transfer => "transfer",
        }
    }
}

/// The user submitting an operation, as seen by the role policy.
#[derive(Debug, Clone)]
pub struct ActingUser {
    /// User ID, recorded on every created row.
    pub id: Uuid,
    /// Role driving the operation policy.
    pub role: Role,
    /// Facility the user is assigned to (relevant for engineers).
    pub assigned_facility: Option<Uuid>,
}

/// One proposed line item of an operation.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationItemInput {
    /// The chemical being moved.
    pub chemical_id: Uuid,
    /// Raw quantity as submitted. Parsed as a fixed two-decimal value; kept
    /// as a string so validation errors can name the offending input.
    pub quantity: String,
}

/// A proposed logical operation: one shared header, one or more line items.
#[derive(Debug, Clone)]
pub struct OperationInput {
    /// The type of operation.
    pub transaction_type: TransactionType,
    /// Source facility (consume, transfer).
    pub from_facility_id: Option<Uuid>,
    /// Destination facility (add, transfer).
    pub to_facility_id: Option<Uuid>,
    /// Logical effective time, caller-supplied. `None` fails validation.
    pub operation_date: Option<DateTime<Utc>>,
    /// Free-form comment.
    pub comment: Option<String>,
    /// Attached document name.
    pub document_name: Option<String>,
    /// Opaque reference to an attached document blob.
    pub document_file: Option<String>,
    /// Line items, in submission order.
    pub items: Vec<OperationItemInput>,
}

/// A validated line item with its parsed quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    /// The chemical being moved.
    pub chemical_id: Uuid,
    /// Parsed, strictly positive quantity at two decimals.
    pub quantity: Decimal,
}

/// A fully validated operation, ready to be persisted as one row per line.
#[derive(Debug, Clone)]
pub struct ResolvedOperation {
    /// The type of operation.
    pub transaction_type: TransactionType,
    /// Resolved source facility.
    pub from_facility_id: Option<Uuid>,
    /// Resolved destination facility.
    pub to_facility_id: Option<Uuid>,
    /// Logical effective time.
    pub operation_date: DateTime<Utc>,
    /// Free-form comment.
    pub comment: Option<String>,
    /// Attached document name.
    pub document_name: Option<String>,
    /// Opaque reference to an attached document blob.
    pub document_file: Option<String>,
    /// User who submitted the operation.
    pub performed_by: Uuid,
    /// Validated lines, in submission order.
    pub lines: Vec<ResolvedLine>,
}

/// The replay engine's view of one persisted ledger row.
///
/// Deliberately minimal: only the fields the fold and the pair derivation
/// need. The database layer maps its entity models into this shape.
#[derive(Debug, Clone)]
pub struct LedgerRow {
    /// The chemical moved by this row.
    pub chemical_id: Uuid,
    /// Positive quantity; direction comes from the facility references.
    pub quantity: Decimal,
    /// Source facility, if any.
    pub from_facility_id: Option<Uuid>,
    /// Destination facility, if any.
    pub to_facility_id: Option<Uuid>,
    /// Logical effective time (primary replay ordering key).
    pub operation_date: DateTime<Utc>,
    /// Record creation time (replay tie-breaker).
    pub timestamp: DateTime<Utc>,
}

/// Normalizes a raw facility reference from the wire.
///
/// Absent, empty and literal `"null"` values all mean "no facility". Any
/// other value must parse as a UUID; a malformed reference can never match
/// an existing facility, so it fails as not found.
///
/// # Errors
///
/// Returns `InventoryError::UnknownFacilityRef` when the value is neither
/// an absent marker nor a valid UUID.
pub fn normalize_facility_ref(raw: Option<&str>) -> Result<Option<Uuid>, InventoryError> {
    match raw {
        None | Some("" | "null") => Ok(None),
        Some(value) => value
            .parse::<Uuid>()
            .map(Some)
            .map_err(|_| InventoryError::UnknownFacilityRef(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_as_str() {
        assert_eq!(TransactionType::Add.as_str(), "add");
        assert_eq!(TransactionType::Consume.as_str(), "consume");
        assert_eq!(TransactionType::Transfer.as_str(), "transfer");
    }

    #[test]
    fn test_normalize_facility_ref_absent_forms() {
        assert_eq!(normalize_facility_ref(None).unwrap(), None);
        assert_eq!(normalize_facility_ref(Some("")).unwrap(), None);
        assert_eq!(normalize_facility_ref(Some("null")).unwrap(), None);
    }

    #[test]
    fn test_normalize_facility_ref_valid_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(
            normalize_facility_ref(Some(&id.to_string())).unwrap(),
            Some(id)
        );
    }

    #[test]
    fn test_normalize_facility_ref_malformed() {
        let err = normalize_facility_ref(Some("not-a-uuid")).unwrap_err();
        assert!(matches!(err, InventoryError::UnknownFacilityRef(_)));
    }
}
