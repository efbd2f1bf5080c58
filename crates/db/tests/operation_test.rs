//! Integration tests for the operation write path and balance recalculation.
//!
//! These tests need a live Postgres instance; they are skipped unless
//! `DATABASE_URL` is set. Run the migrator against a scratch database first.

use std::env;

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use sea_orm::Database;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use chemstock_core::inventory::{
    ActingUser, OperationInput, OperationItemInput, TransactionType,
};
use chemstock_db::repositories::balance::{BalanceFilter, BalanceRepository};
use chemstock_db::repositories::chemical::{ChemicalInput, ChemicalRepository};
use chemstock_db::repositories::facility::{FacilityInput, FacilityRepository};
use chemstock_db::repositories::operation::OperationRepository;
use chemstock_db::repositories::report::ReportRepository;
use chemstock_db::entities::sea_orm_active_enums::FacilityType;
use chemstock_shared::types::Role;

async fn connect() -> Option<DatabaseConnection> {
    let url = env::var("DATABASE_URL").ok()?;
    Some(
        Database::connect(&url)
            .await
            .expect("Failed to connect to database"),
    )
}

fn acting_admin() -> ActingUser {
    ActingUser {
        id: Uuid::new_v4(),
        role: Role::Admin,
        assigned_facility: None,
    }
}

fn operation(
    transaction_type: TransactionType,
    from: Option<Uuid>,
    to: Option<Uuid>,
    day: u32,
    items: Vec<OperationItemInput>,
) -> OperationInput {
    OperationInput {
        transaction_type,
        from_facility_id: from,
        to_facility_id: to,
        operation_date: Some(Utc.with_ymd_and_hms(2026, 6, day, 12, 0, 0).unwrap()),
        comment: None,
        document_name: None,
        document_file: None,
        items,
    }
}

fn item(chemical_id: Uuid, quantity: &str) -> OperationItemInput {
    OperationItemInput {
        chemical_id,
        quantity: quantity.to_string(),
    }
}

async fn seed(db: &DatabaseConnection) -> (Uuid, Uuid) {
    let facility = FacilityRepository::new(db.clone())
        .create(FacilityInput {
            name: format!("Warehouse {}", Uuid::new_v4()),
            facility_type: FacilityType::Warehouse,
            location: None,
        })
        .await
        .expect("Failed to create facility");
    let chemical = ChemicalRepository::new(db.clone())
        .create(ChemicalInput {
            name: format!("Methanol {}", Uuid::new_v4()),
            unit_of_measurement: "kg".to_string(),
            description: None,
        })
        .await
        .expect("Failed to create chemical");
    (facility.id, chemical.id)
}

async fn balance_of(db: &DatabaseConnection, facility: Uuid, chemical: Uuid) -> rust_decimal::Decimal {
    let rows = BalanceRepository::new(db.clone())
        .list(BalanceFilter {
            facility_id: Some(facility),
            chemical_id: Some(chemical),
        })
        .await
        .expect("Failed to list balances");
    rows.first().map_or(rust_decimal::Decimal::ZERO, |b| b.quantity)
}

#[tokio::test]
async fn test_add_consume_delete_replays_balance() {
    let Some(db) = connect().await else { return };
    let (facility, chemical) = seed(&db).await;
    let repo = OperationRepository::new(db.clone());
    let user = acting_admin();

    // Add 100 on day 1.
    let added = repo
        .create_operation(
            operation(TransactionType::Add, None, Some(facility), 1, vec![item(chemical, "100")]),
            &user,
        )
        .await
        .expect("Failed to create add operation");
    assert_eq!(added.len(), 1);
    assert_eq!(balance_of(&db, facility, chemical).await, dec!(100.00));

    // Consume 40 on day 10.
    let consumed = repo
        .create_operation(
            operation(
                TransactionType::Consume,
                Some(facility),
                None,
                10,
                vec![item(chemical, "40")],
            ),
            &user,
        )
        .await
        .expect("Failed to create consume operation");
    assert_eq!(balance_of(&db, facility, chemical).await, dec!(60.00));

    // Deleting the consume replays the pair back to 100.
    repo.delete_operation(consumed[0].operation_uuid)
        .await
        .expect("Failed to delete operation");
    assert_eq!(balance_of(&db, facility, chemical).await, dec!(100.00));
}

#[tokio::test]
async fn test_transfer_moves_stock_between_facilities() {
    let Some(db) = connect().await else { return };
    let (source, chemical) = seed(&db).await;
    let destination = FacilityRepository::new(db.clone())
        .create(FacilityInput {
            name: format!("Well {}", Uuid::new_v4()),
            facility_type: FacilityType::Well,
            location: None,
        })
        .await
        .expect("Failed to create facility")
        .id;
    let repo = OperationRepository::new(db.clone());
    let user = acting_admin();

    repo.create_operation(
        operation(TransactionType::Add, None, Some(source), 1, vec![item(chemical, "50")]),
        &user,
    )
    .await
    .expect("Failed to create add operation");

    repo.create_operation(
        operation(
            TransactionType::Transfer,
            Some(source),
            Some(destination),
            5,
            vec![item(chemical, "20")],
        ),
        &user,
    )
    .await
    .expect("Failed to create transfer operation");

    assert_eq!(balance_of(&db, source, chemical).await, dec!(30.00));
    assert_eq!(balance_of(&db, destination, chemical).await, dec!(20.00));
}

#[tokio::test]
async fn test_edit_replaces_rows_under_fresh_operation_id() {
    let Some(db) = connect().await else { return };
    let (facility, chemical) = seed(&db).await;
    let repo = OperationRepository::new(db.clone());
    let user = acting_admin();

    let added = repo
        .create_operation(
            operation(TransactionType::Add, None, Some(facility), 1, vec![item(chemical, "100")]),
            &user,
        )
        .await
        .expect("Failed to create add operation");
    let old_uuid = added[0].operation_uuid;

    let outcome = repo
        .edit_operation(
            old_uuid,
            operation(TransactionType::Add, None, Some(facility), 1, vec![item(chemical, "70")]),
            &user,
        )
        .await
        .expect("Failed to edit operation");

    let new_uuid = outcome.operation_uuid.expect("Edit should keep the operation alive");
    assert_ne!(new_uuid, old_uuid);
    assert_eq!(balance_of(&db, facility, chemical).await, dec!(70.00));
}

#[tokio::test]
async fn test_edit_with_no_items_deletes_the_operation() {
    let Some(db) = connect().await else { return };
    let (facility, chemical) = seed(&db).await;
    let repo = OperationRepository::new(db.clone());
    let user = acting_admin();

    let added = repo
        .create_operation(
            operation(TransactionType::Add, None, Some(facility), 1, vec![item(chemical, "25")]),
            &user,
        )
        .await
        .expect("Failed to create add operation");

    let outcome = repo
        .edit_operation(
            added[0].operation_uuid,
            operation(TransactionType::Add, None, Some(facility), 1, vec![]),
            &user,
        )
        .await
        .expect("Failed to edit operation");

    assert!(outcome.operation_uuid.is_none());
    assert_eq!(balance_of(&db, facility, chemical).await, dec!(0.00));
}

#[tokio::test]
async fn test_one_bad_item_persists_nothing() {
    let Some(db) = connect().await else { return };
    let (facility, chemical) = seed(&db).await;
    let repo = OperationRepository::new(db.clone());
    let user = acting_admin();

    // Second line fails quantity validation; the whole group must roll back.
    let err = repo
        .create_operation(
            operation(
                TransactionType::Add,
                None,
                Some(facility),
                1,
                vec![item(chemical, "10"), item(chemical, "-5")],
            ),
            &user,
        )
        .await
        .expect_err("Invalid quantity should fail the operation");
    assert_eq!(err.error_code(), "INVALID_QUANTITY");
    assert_eq!(balance_of(&db, facility, chemical).await, rust_decimal::Decimal::ZERO);
}

#[tokio::test]
async fn test_failed_edit_leaves_original_rows_and_balance() {
    let Some(db) = connect().await else { return };
    let (facility, chemical) = seed(&db).await;
    let repo = OperationRepository::new(db.clone());
    let user = acting_admin();

    let added = repo
        .create_operation(
            operation(TransactionType::Add, None, Some(facility), 1, vec![item(chemical, "100")]),
            &user,
        )
        .await
        .expect("Failed to create add operation");
    let operation_uuid = added[0].operation_uuid;

    // Replacement payload references a chemical that does not exist; the
    // delete inside the edit must roll back with it.
    let err = repo
        .edit_operation(
            operation_uuid,
            operation(
                TransactionType::Add,
                None,
                Some(facility),
                1,
                vec![item(Uuid::new_v4(), "50")],
            ),
            &user,
        )
        .await
        .expect_err("Unknown chemical should fail the edit");
    assert_eq!(err.error_code(), "NOT_FOUND");
    assert_eq!(balance_of(&db, facility, chemical).await, dec!(100.00));

    // The original operation is still deletable, so its rows survived.
    repo.delete_operation(operation_uuid)
        .await
        .expect("Original operation should still exist");
    assert_eq!(balance_of(&db, facility, chemical).await, dec!(0.00));
}

#[tokio::test]
async fn test_backdated_operation_rebuilds_history() {
    let Some(db) = connect().await else { return };
    let (facility, chemical) = seed(&db).await;
    let repo = OperationRepository::new(db.clone());
    let user = acting_admin();

    repo.create_operation(
        operation(
            TransactionType::Consume,
            Some(facility),
            None,
            10,
            vec![item(chemical, "30")],
        ),
        &user,
    )
    .await
    .expect("Failed to create consume operation");
    assert_eq!(balance_of(&db, facility, chemical).await, dec!(-30.00));

    // Backdated add lands before the consume; replay absorbs it.
    repo.create_operation(
        operation(TransactionType::Add, None, Some(facility), 1, vec![item(chemical, "100")]),
        &user,
    )
    .await
    .expect("Failed to create add operation");
    assert_eq!(balance_of(&db, facility, chemical).await, dec!(70.00));
}

#[tokio::test]
async fn test_period_report_matches_log() {
    let Some(db) = connect().await else { return };
    let (facility, chemical) = seed(&db).await;
    let repo = OperationRepository::new(db.clone());
    let user = acting_admin();

    repo.create_operation(
        operation(TransactionType::Add, None, Some(facility), 1, vec![item(chemical, "100")]),
        &user,
    )
    .await
    .expect("Failed to create add operation");
    repo.create_operation(
        operation(
            TransactionType::Consume,
            Some(facility),
            None,
            10,
            vec![item(chemical, "40")],
        ),
        &user,
    )
    .await
    .expect("Failed to create consume operation");

    // Window opens after the add and covers the consume.
    let report = ReportRepository::new(db.clone())
        .inventory_period(
            facility,
            chemical,
            Utc.with_ymd_and_hms(2026, 6, 5, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 6, 15, 0, 0, 0).unwrap(),
        )
        .await
        .expect("Failed to compute report");

    assert_eq!(report.opening_balance, dec!(100.00));
    assert_eq!(report.total_income, dec!(0));
    assert_eq!(report.total_outcome, dec!(40.00));
    assert_eq!(report.closing_balance, dec!(60.00));
}
