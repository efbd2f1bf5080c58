//! Transaction repository for read-side ledger queries.
//!
//! Writes never happen here; every mutation of the transaction log goes
//! through [`crate::repositories::OperationRepository`] so that balances
//! are recalculated in the same database transaction.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::TransactionType, transactions};

/// Error types for transaction queries.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl TransactionError {
    /// Machine-readable error code for the API envelope.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// HTTP status code matching the error code.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Database(_) => 500,
        }
    }
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by chemical.
    pub chemical_id: Option<Uuid>,
    /// Filter by movement kind.
    pub transaction_type: Option<TransactionType>,
    /// Filter by facility on either side of the movement.
    pub facility_id: Option<Uuid>,
    /// Filter by logical operation group.
    pub operation_uuid: Option<Uuid>,
    /// Filter by effective date, inclusive lower bound.
    pub start_date: Option<DateTime<Utc>>,
    /// Filter by effective date, inclusive upper bound.
    pub end_date: Option<DateTime<Utc>>,
}

/// Transaction repository for listing the ledger.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists ledger rows with optional filters, newest operations first.
    ///
    /// Ordering groups rows of one operation together: operation id
    /// descending, then record creation time descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let mut query = transactions::Entity::find();

        if let Some(chemical_id) = filter.chemical_id {
            query = query.filter(transactions::Column::ChemicalId.eq(chemical_id));
        }

        if let Some(tx_type) = filter.transaction_type {
            query = query.filter(transactions::Column::TransactionType.eq(tx_type));
        }

        if let Some(facility_id) = filter.facility_id {
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::FromFacilityId.eq(facility_id))
                    .add(transactions::Column::ToFacilityId.eq(facility_id)),
            );
        }

        if let Some(operation_uuid) = filter.operation_uuid {
            query = query.filter(transactions::Column::OperationUuid.eq(operation_uuid));
        }

        if let Some(start_date) = filter.start_date {
            query = query.filter(transactions::Column::OperationDate.gte(start_date));
        }

        if let Some(end_date) = filter.end_date {
            query = query.filter(transactions::Column::OperationDate.lte(end_date));
        }

        let rows = query
            .order_by_desc(transactions::Column::OperationUuid)
            .order_by_desc(transactions::Column::Timestamp)
            .all(&self.db)
            .await?;

        Ok(rows)
    }
}
