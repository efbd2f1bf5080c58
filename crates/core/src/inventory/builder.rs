//! Operation validation and materialization.
//!
//! Validates a proposed logical operation against the type/facility rules
//! and the role policy, then resolves it into line items ready to be
//! persisted as one transaction row each. Pure logic: facility and chemical
//! existence checks are injected so the database layer can run this inside
//! its own transaction.

use chemstock_shared::types::{Role, quantity};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::InventoryError;
use super::types::{
    ActingUser, OperationInput, ResolvedLine, ResolvedOperation, TransactionType,
};

/// Validates a proposed operation and resolves its line items.
///
/// Validation is fail-fast; the first violation wins:
/// 1. `operation_date` must be present.
/// 2. From/to facility references must resolve to existing facilities.
/// 3. The facility pair must match the operation type: add needs a
///    destination, consume needs a source, transfer needs both and they
///    must be distinct.
/// 4. Engineers may only submit consume operations from their assigned
///    facility.
/// 5. Items must be non-empty; every quantity must parse as a fixed
///    two-decimal value and be strictly positive; every chemical must exist.
///
/// Nothing is persisted here; a failure at any step leaves no trace.
///
/// # Errors
///
/// Returns the corresponding `InventoryError` for the first rule violated.
pub fn validate_operation<F, C>(
    input: &OperationInput,
    acting_user: &ActingUser,
    facility_exists: F,
    chemical_exists: C,
) -> Result<ResolvedOperation, InventoryError>
where
    F: Fn(Uuid) -> bool,
    C: Fn(Uuid) -> bool,
{
    // 1. Effective time is caller-supplied and mandatory.
    let operation_date = input
        .operation_date
        .ok_or(InventoryError::MissingField("operation_date"))?;

    // 2. Resolve facility references.
    let from_facility_id = resolve_facility(input.from_facility_id, &facility_exists)?;
    let to_facility_id = resolve_facility(input.to_facility_id, &facility_exists)?;

    // 3. Type-specific facility requirements.
    validate_facility_pair(input.transaction_type, from_facility_id, to_facility_id)?;

    // 4. Role policy.
    validate_role_policy(input.transaction_type, from_facility_id, acting_user)?;

    // 5. Line items.
    if input.items.is_empty() {
        return Err(InventoryError::MissingField("items"));
    }

    let mut lines = Vec::with_capacity(input.items.len());
    for item in &input.items {
        let parsed = parse_positive_quantity(&item.quantity)?;
        if !chemical_exists(item.chemical_id) {
            return Err(InventoryError::ChemicalNotFound(item.chemical_id));
        }
        lines.push(ResolvedLine {
            chemical_id: item.chemical_id,
            quantity: parsed,
        });
    }

    Ok(ResolvedOperation {
        transaction_type: input.transaction_type,
        from_facility_id,
        to_facility_id,
        operation_date,
        comment: input.comment.clone(),
        document_name: input.document_name.clone(),
        document_file: input.document_file.clone(),
        performed_by: acting_user.id,
        lines,
    })
}

fn resolve_facility<F>(id: Option<Uuid>, facility_exists: &F) -> Result<Option<Uuid>, InventoryError>
where
    F: Fn(Uuid) -> bool,
{
    match id {
        None => Ok(None),
        Some(id) if facility_exists(id) => Ok(Some(id)),
        Some(id) => Err(InventoryError::FacilityNotFound(id)),
    }
}

fn validate_facility_pair(
    transaction_type: TransactionType,
    from: Option<Uuid>,
    to: Option<Uuid>,
) -> Result<(), InventoryError> {
    match transaction_type {
        TransactionType::Add => {
            if to.is_none() {
                return Err(InventoryError::InvalidOperation(
                    "add requires a destination facility (to_facility)".to_string(),
                ));
            }
        }
        TransactionType::Consume => {
            if from.is_none() {
                return Err(InventoryError::InvalidOperation(
                    "consume requires a source facility (from_facility)".to_string(),
                ));
            }
        }
        TransactionType::Transfer => {
            if from.is_none() || to.is_none() {
                return Err(InventoryError::InvalidOperation(
                    "transfer requires both source and destination facilities".to_string(),
                ));
            }
            if from == to {
                return Err(InventoryError::InvalidOperation(
                    "transfer requires two distinct facilities".to_string(),
                ));
            }
        }
    }
    Ok(())
}

fn validate_role_policy(
    transaction_type: TransactionType,
    from: Option<Uuid>,
    acting_user: &ActingUser,
) -> Result<(), InventoryError> {
    if acting_user.role != Role::Engineer {
        return Ok(());
    }

    if transaction_type != TransactionType::Consume {
        return Err(InventoryError::PermissionDenied(
            "engineers may only submit consume operations".to_string(),
        ));
    }

    // `from` is guaranteed present for consume by the pair check above.
    if from != acting_user.assigned_facility {
        return Err(InventoryError::PermissionDenied(
            "engineers may only consume from their assigned facility".to_string(),
        ));
    }

    Ok(())
}

fn parse_positive_quantity(raw: &str) -> Result<Decimal, InventoryError> {
    match quantity::parse_fixed(raw) {
        Some(parsed) if parsed > Decimal::ZERO => Ok(parsed),
        _ => Err(InventoryError::InvalidQuantity(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::types::OperationItemInput;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn user(role: Role, assigned: Option<Uuid>) -> ActingUser {
        ActingUser {
            id: Uuid::new_v4(),
            role,
            assigned_facility: assigned,
        }
    }

    fn item(chemical_id: Uuid, quantity: &str) -> OperationItemInput {
        OperationItemInput {
            chemical_id,
            quantity: quantity.to_string(),
        }
    }

    fn input(
        transaction_type: TransactionType,
        from: Option<Uuid>,
        to: Option<Uuid>,
        items: Vec<OperationItemInput>,
    ) -> OperationInput {
        OperationInput {
            transaction_type,
            from_facility_id: from,
            to_facility_id: to,
            operation_date: Some(Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()),
            comment: Some("delivery".to_string()),
            document_name: None,
            document_file: None,
            items,
        }
    }

    fn any_facility(_: Uuid) -> bool {
        true
    }

    fn any_chemical(_: Uuid) -> bool {
        true
    }

    #[test]
    fn test_valid_add_resolves_lines_in_order() {
        let warehouse = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let input = input(
            TransactionType::Add,
            None,
            Some(warehouse),
            vec![item(first, "100.00"), item(second, "2.5")],
        );

        let resolved = validate_operation(
            &input,
            &user(Role::Logistician, None),
            any_facility,
            any_chemical,
        )
        .unwrap();

        assert_eq!(resolved.to_facility_id, Some(warehouse));
        assert_eq!(resolved.lines.len(), 2);
        assert_eq!(resolved.lines[0].chemical_id, first);
        assert_eq!(resolved.lines[0].quantity, dec!(100.00));
        assert_eq!(resolved.lines[1].chemical_id, second);
        assert_eq!(resolved.lines[1].quantity, dec!(2.50));
    }

    #[test]
    fn test_missing_operation_date() {
        let mut input = input(
            TransactionType::Add,
            None,
            Some(Uuid::new_v4()),
            vec![item(Uuid::new_v4(), "1")],
        );
        input.operation_date = None;

        let err = validate_operation(
            &input,
            &user(Role::Admin, None),
            any_facility,
            any_chemical,
        )
        .unwrap_err();
        assert_eq!(err, InventoryError::MissingField("operation_date"));
    }

    #[test]
    fn test_unresolvable_facility() {
        let ghost = Uuid::new_v4();
        let input = input(
            TransactionType::Add,
            None,
            Some(ghost),
            vec![item(Uuid::new_v4(), "1")],
        );

        let err = validate_operation(
            &input,
            &user(Role::Admin, None),
            |_| false,
            any_chemical,
        )
        .unwrap_err();
        assert_eq!(err, InventoryError::FacilityNotFound(ghost));
    }

    #[test]
    fn test_add_without_destination() {
        let input = input(
            TransactionType::Add,
            Some(Uuid::new_v4()),
            None,
            vec![item(Uuid::new_v4(), "1")],
        );

        let err = validate_operation(
            &input,
            &user(Role::Admin, None),
            any_facility,
            any_chemical,
        )
        .unwrap_err();
        assert!(matches!(err, InventoryError::InvalidOperation(_)));
    }

    #[test]
    fn test_consume_without_source() {
        let input = input(
            TransactionType::Consume,
            None,
            Some(Uuid::new_v4()),
            vec![item(Uuid::new_v4(), "1")],
        );

        let err = validate_operation(
            &input,
            &user(Role::Admin, None),
            any_facility,
            any_chemical,
        )
        .unwrap_err();
        assert!(matches!(err, InventoryError::InvalidOperation(_)));
    }

    #[test]
    fn test_transfer_requires_both_facilities() {
        let input = input(
            TransactionType::Transfer,
            Some(Uuid::new_v4()),
            None,
            vec![item(Uuid::new_v4(), "1")],
        );

        let err = validate_operation(
            &input,
            &user(Role::Admin, None),
            any_facility,
            any_chemical,
        )
        .unwrap_err();
        assert!(matches!(err, InventoryError::InvalidOperation(_)));
    }

    #[test]
    fn test_transfer_rejects_same_facility() {
        let here = Uuid::new_v4();
        let input = input(
            TransactionType::Transfer,
            Some(here),
            Some(here),
            vec![item(Uuid::new_v4(), "1")],
        );

        let err = validate_operation(
            &input,
            &user(Role::Admin, None),
            any_facility,
            any_chemical,
        )
        .unwrap_err();
        assert!(matches!(err, InventoryError::InvalidOperation(_)));
    }

    #[test]
    fn test_engineer_cannot_add() {
        let facility = Uuid::new_v4();
        let input = input(
            TransactionType::Add,
            None,
            Some(facility),
            vec![item(Uuid::new_v4(), "1")],
        );

        let err = validate_operation(
            &input,
            &user(Role::Engineer, Some(facility)),
            any_facility,
            any_chemical,
        )
        .unwrap_err();
        assert!(matches!(err, InventoryError::PermissionDenied(_)));
    }

    #[test]
    fn test_engineer_cannot_consume_from_foreign_facility() {
        let own = Uuid::new_v4();
        let foreign = Uuid::new_v4();
        let input = input(
            TransactionType::Consume,
            Some(foreign),
            None,
            vec![item(Uuid::new_v4(), "1")],
        );

        let err = validate_operation(
            &input,
            &user(Role::Engineer, Some(own)),
            any_facility,
            any_chemical,
        )
        .unwrap_err();
        assert!(matches!(err, InventoryError::PermissionDenied(_)));
    }

    #[test]
    fn test_engineer_can_consume_from_own_facility() {
        let own = Uuid::new_v4();
        let input = input(
            TransactionType::Consume,
            Some(own),
            None,
            vec![item(Uuid::new_v4(), "40.00")],
        );

        let resolved = validate_operation(
            &input,
            &user(Role::Engineer, Some(own)),
            any_facility,
            any_chemical,
        )
        .unwrap();
        assert_eq!(resolved.from_facility_id, Some(own));
    }

    #[test]
    fn test_engineer_without_assignment_cannot_consume() {
        let input = input(
            TransactionType::Consume,
            Some(Uuid::new_v4()),
            None,
            vec![item(Uuid::new_v4(), "1")],
        );

        let err = validate_operation(
            &input,
            &user(Role::Engineer, None),
            any_facility,
            any_chemical,
        )
        .unwrap_err();
        assert!(matches!(err, InventoryError::PermissionDenied(_)));
    }

    #[test]
    fn test_empty_items_rejected() {
        let input = input(TransactionType::Add, None, Some(Uuid::new_v4()), vec![]);

        let err = validate_operation(
            &input,
            &user(Role::Admin, None),
            any_facility,
            any_chemical,
        )
        .unwrap_err();
        assert_eq!(err, InventoryError::MissingField("items"));
    }

    #[rstest::rstest]
    #[case("abc")]
    #[case("-5")]
    #[case("0")]
    #[case("")]
    fn test_invalid_quantity_names_raw_value(#[case] raw: &str) {
        let input = input(
            TransactionType::Add,
            None,
            Some(Uuid::new_v4()),
            vec![item(Uuid::new_v4(), raw)],
        );

        let err = validate_operation(
            &input,
            &user(Role::Admin, None),
            any_facility,
            any_chemical,
        )
        .unwrap_err();
        assert_eq!(err, InventoryError::InvalidQuantity(raw.to_string()));
    }

    #[test]
    fn test_unknown_chemical_rejected() {
        let ghost = Uuid::new_v4();
        let input = input(
            TransactionType::Add,
            None,
            Some(Uuid::new_v4()),
            vec![item(ghost, "1")],
        );

        let err = validate_operation(
            &input,
            &user(Role::Admin, None),
            any_facility,
            |_| false,
        )
        .unwrap_err();
        assert_eq!(err, InventoryError::ChemicalNotFound(ghost));
    }
}
