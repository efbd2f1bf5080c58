//! Operation repository: the single write path into the transaction log.
//!
//! Creating, editing and deleting a logical operation each run inside one
//! database transaction that also rebuilds every affected balance, so the
//! cache never drifts from the log and a failure anywhere rolls back both.

use std::collections::HashSet;

use chemstock_core::inventory::{
    ActingUser, InventoryError, OperationInput, validate_operation,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{chemicals, facilities, transactions};
use crate::repositories::balance::{self, BalanceError, pairs_for};

/// Error types for operation writes.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// The operation failed domain validation.
    #[error(transparent)]
    Validation(#[from] InventoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BalanceError> for OperationError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::Database(db) => Self::Database(db),
        }
    }
}

impl OperationError {
    /// Machine-readable error code for the API envelope.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// HTTP status code matching the error code.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(err) => err.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

/// Result of an edit: the replacement rows, if any remain.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    /// Operation id of the replacement rows. `None` when the edit removed
    /// every line and the operation ceased to exist.
    pub operation_uuid: Option<Uuid>,
    /// The freshly created rows, in submission order.
    pub rows: Vec<transactions::Model>,
}

/// Operation repository: grouped create, edit and delete with recalculation.
#[derive(Debug, Clone)]
pub struct OperationRepository {
    db: DatabaseConnection,
}

impl OperationRepository {
    /// Creates a new operation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and persists one logical operation, then rebuilds every
    /// affected balance. All-or-nothing: a failed line rolls back the lot.
    ///
    /// # Errors
    ///
    /// Returns a validation error from the domain rules, or a database error
    /// if any statement fails.
    pub async fn create_operation(
        &self,
        input: OperationInput,
        acting_user: &ActingUser,
    ) -> Result<Vec<transactions::Model>, OperationError> {
        let txn = self.db.begin().await?;

        let rows = insert_operation(&txn, &input, acting_user).await?;

        let pairs = pairs_for(&rows);
        balance::recalculate(&txn, &pairs).await?;

        txn.commit().await?;
        tracing::info!(
            operation_uuid = %rows[0].operation_uuid,
            lines = rows.len(),
            pairs = pairs.len(),
            "operation created"
        );
        Ok(rows)
    }

    /// Replaces a logical operation wholesale.
    ///
    /// The original rows are deleted and the submitted payload is validated
    /// and re-created under a fresh operation id, in one database
    /// transaction. An empty item list degenerates to a plain delete.
    /// Balances are rebuilt for the union of old and new pairs.
    ///
    /// # Errors
    ///
    /// Returns `OperationNotFound` if no rows carry the given id, a
    /// validation error for the replacement payload, or a database error.
    pub async fn edit_operation(
        &self,
        operation_uuid: Uuid,
        input: OperationInput,
        acting_user: &ActingUser,
    ) -> Result<EditOutcome, OperationError> {
        let txn = self.db.begin().await?;

        let originals = rows_of_operation(&txn, operation_uuid).await?;
        if originals.is_empty() {
            return Err(InventoryError::OperationNotFound(operation_uuid).into());
        }
        let mut pairs = pairs_for(&originals);

        transactions::Entity::delete_many()
            .filter(transactions::Column::OperationUuid.eq(operation_uuid))
            .exec(&txn)
            .await?;

        let outcome = if input.items.is_empty() {
            EditOutcome {
                operation_uuid: None,
                rows: Vec::new(),
            }
        } else {
            let rows = insert_operation(&txn, &input, acting_user).await?;
            pairs.extend(pairs_for(&rows));
            EditOutcome {
                operation_uuid: rows.first().map(|row| row.operation_uuid),
                rows,
            }
        };

        balance::recalculate(&txn, &pairs).await?;
        txn.commit().await?;
        tracing::info!(
            old_operation_uuid = %operation_uuid,
            new_operation_uuid = ?outcome.operation_uuid,
            pairs = pairs.len(),
            "operation edited"
        );
        Ok(outcome)
    }

    /// Deletes a logical operation and rebuilds the balances it touched.
    ///
    /// # Errors
    ///
    /// Returns `OperationNotFound` if no rows carry the given id, or a
    /// database error.
    pub async fn delete_operation(&self, operation_uuid: Uuid) -> Result<(), OperationError> {
        let txn = self.db.begin().await?;

        let originals = rows_of_operation(&txn, operation_uuid).await?;
        if originals.is_empty() {
            return Err(InventoryError::OperationNotFound(operation_uuid).into());
        }
        let pairs = pairs_for(&originals);

        transactions::Entity::delete_many()
            .filter(transactions::Column::OperationUuid.eq(operation_uuid))
            .exec(&txn)
            .await?;

        balance::recalculate(&txn, &pairs).await?;
        txn.commit().await?;
        tracing::info!(%operation_uuid, pairs = pairs.len(), "operation deleted");
        Ok(())
    }
}

/// Fetches the rows of one logical operation, in creation order.
async fn rows_of_operation(
    txn: &DatabaseTransaction,
    operation_uuid: Uuid,
) -> Result<Vec<transactions::Model>, DbErr> {
    transactions::Entity::find()
        .filter(transactions::Column::OperationUuid.eq(operation_uuid))
        .order_by_asc(transactions::Column::Timestamp)
        .all(txn)
        .await
}

/// Validates the payload against current reference data and materializes it
/// as one row per line under a fresh operation id.
///
/// Existence checks are snapshotted into id sets first; the domain validator
/// is pure and closes over them.
async fn insert_operation(
    txn: &DatabaseTransaction,
    input: &OperationInput,
    acting_user: &ActingUser,
) -> Result<Vec<transactions::Model>, OperationError> {
    let facility_ids: HashSet<Uuid> = facilities::Entity::find()
        .select_only()
        .column(facilities::Column::Id)
        .into_tuple()
        .all(txn)
        .await?
        .into_iter()
        .collect();
    let chemical_ids: HashSet<Uuid> = chemicals::Entity::find()
        .select_only()
        .column(chemicals::Column::Id)
        .into_tuple()
        .all(txn)
        .await?
        .into_iter()
        .collect();

    let resolved = validate_operation(
        input,
        acting_user,
        |id| facility_ids.contains(&id),
        |id| chemical_ids.contains(&id),
    )?;

    let operation_uuid = Uuid::new_v4();
    let now = Utc::now();
    let mut rows = Vec::with_capacity(resolved.lines.len());

    for line in &resolved.lines {
        let row = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            operation_uuid: Set(operation_uuid),
            transaction_type: Set(resolved.transaction_type.into()),
            chemical_id: Set(line.chemical_id),
            quantity: Set(line.quantity),
            from_facility_id: Set(resolved.from_facility_id),
            to_facility_id: Set(resolved.to_facility_id),
            performed_by: Set(Some(resolved.performed_by)),
            operation_date: Set(resolved.operation_date.into()),
            timestamp: Set(now.into()),
            document_name: Set(resolved.document_name.clone()),
            document_file: Set(resolved.document_file.clone()),
            comment: Set(resolved.comment.clone()),
        };
        rows.push(row.insert(txn).await?);
    }

    Ok(rows)
}
