//! Balance repository and the full-replay recalculation engine.
//!
//! Balances are a derived cache over the transaction log. Whenever the log
//! changes, every affected (facility, chemical) pair is rebuilt from scratch
//! by replaying the pair's full history through
//! [`chemstock_core::inventory::replay_balance`]. Incremental adjustment is
//! deliberately avoided: replay is self-healing after edits, deletes and
//! backdated operations alike.

use std::collections::BTreeSet;

use chemstock_core::inventory::{LedgerRow, Pair, affected_pairs, replay_balance};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{balances, transactions};

/// Error types for balance operations.
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl BalanceError {
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

/// Filter options for listing balances.
#[derive(Debug, Clone, Default)]
pub struct BalanceFilter {
    /// Filter by facility.
    pub facility_id: Option<Uuid>,
    /// Filter by chemical.
    pub chemical_id: Option<Uuid>,
}

/// Balance repository for reading the cached stock levels.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists cached balances with optional filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: BalanceFilter) -> Result<Vec<balances::Model>, BalanceError> {
        let mut query = balances::Entity::find();

        if let Some(facility_id) = filter.facility_id {
            query = query.filter(balances::Column::FacilityId.eq(facility_id));
        }
        if let Some(chemical_id) = filter.chemical_id {
            query = query.filter(balances::Column::ChemicalId.eq(chemical_id));
        }

        let rows = query
            .order_by_asc(balances::Column::FacilityId)
            .order_by_asc(balances::Column::ChemicalId)
            .all(&self.db)
            .await?;
        Ok(rows)
    }
}

/// Maps a persisted ledger row into the pure replay representation.
fn to_ledger_row(model: &transactions::Model) -> LedgerRow {
    LedgerRow {
        chemical_id: model.chemical_id,
        quantity: model.quantity,
        from_facility_id: model.from_facility_id,
        to_facility_id: model.to_facility_id,
        operation_date: model.operation_date.with_timezone(&Utc),
        timestamp: model.timestamp.with_timezone(&Utc),
    }
}

/// Collects the (facility, chemical) pairs touched by a set of ledger rows.
#[must_use]
pub fn pairs_for(models: &[transactions::Model]) -> BTreeSet<Pair> {
    let rows: Vec<LedgerRow> = models.iter().map(to_ledger_row).collect();
    affected_pairs(&rows)
}

/// Recalculates every pair in the set, inside the caller's transaction.
///
/// # Errors
///
/// Returns an error if any query or upsert fails.
pub async fn recalculate<C: ConnectionTrait>(
    conn: &C,
    pairs: &BTreeSet<Pair>,
) -> Result<(), BalanceError> {
    for pair in pairs {
        recalculate_pair(conn, *pair).await?;
    }
    Ok(())
}

/// Rebuilds one (facility, chemical) balance from the pair's full history.
///
/// The cached row is taken `FOR UPDATE` first so concurrent writers to the
/// same pair serialize on it instead of racing the read-then-write.
///
/// # Errors
///
/// Returns an error if any query or upsert fails.
pub async fn recalculate_pair<C: ConnectionTrait>(
    conn: &C,
    pair: Pair,
) -> Result<(), BalanceError> {
    let existing = balances::Entity::find()
        .filter(balances::Column::FacilityId.eq(pair.facility_id))
        .filter(balances::Column::ChemicalId.eq(pair.chemical_id))
        .lock_exclusive()
        .one(conn)
        .await?;

    let history = transactions::Entity::find()
        .filter(transactions::Column::ChemicalId.eq(pair.chemical_id))
        .filter(
            Condition::any()
                .add(transactions::Column::FromFacilityId.eq(pair.facility_id))
                .add(transactions::Column::ToFacilityId.eq(pair.facility_id)),
        )
        .order_by_asc(transactions::Column::OperationDate)
        .order_by_asc(transactions::Column::Timestamp)
        .all(conn)
        .await?;

    let rows: Vec<LedgerRow> = history.iter().map(to_ledger_row).collect();
    let quantity = replay_balance(pair.facility_id, &rows);

    match existing {
        Some(model) => {
            let mut active: balances::ActiveModel = model.into();
            active.quantity = Set(quantity);
            active.updated_at = Set(Utc::now().into());
            active.update(conn).await?;
        }
        None => {
            let active = balances::ActiveModel {
                id: Set(Uuid::new_v4()),
                facility_id: Set(pair.facility_id),
                chemical_id: Set(pair.chemical_id),
                quantity: Set(quantity),
                updated_at: Set(Utc::now().into()),
            };
            active.insert(conn).await?;
        }
    }

    Ok(())
}
