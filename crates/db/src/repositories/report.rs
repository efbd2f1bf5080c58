//! Report repository: period reports computed straight from the log.
//!
//! The balance cache is never consulted here. Opening and closing figures
//! come from summing the transaction history around the requested window,
//! so a stale cache cannot skew a report.

use chemstock_core::inventory::PeriodReport;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::entities::transactions;

/// Error types for report queries.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ReportError {
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

/// Which side of a movement to sum for the facility.
#[derive(Debug, Clone, Copy)]
enum Side {
    Incoming,
    Outgoing,
}

/// Which part of the timeline to sum.
#[derive(Debug, Clone, Copy)]
enum Window {
    /// Strictly before the report window.
    Before(DateTime<Utc>),
    /// Inside the window, bounds inclusive.
    Within(DateTime<Utc>, DateTime<Utc>),
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes the period report for one facility, chemical and inclusive
    /// date window.
    ///
    /// Four aggregate sums over the log: incoming/outgoing before the window
    /// give the opening balance, incoming/outgoing inside it give the
    /// totals.
    ///
    /// # Errors
    ///
    /// Returns an error if any aggregate query fails.
    pub async fn inventory_period(
        &self,
        facility_id: Uuid,
        chemical_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PeriodReport, ReportError> {
        let opening_in = self
            .sum(facility_id, chemical_id, Side::Incoming, Window::Before(start))
            .await?;
        let opening_out = self
            .sum(facility_id, chemical_id, Side::Outgoing, Window::Before(start))
            .await?;
        let period_in = self
            .sum(facility_id, chemical_id, Side::Incoming, Window::Within(start, end))
            .await?;
        let period_out = self
            .sum(facility_id, chemical_id, Side::Outgoing, Window::Within(start, end))
            .await?;

        Ok(PeriodReport::from_sums(
            opening_in,
            opening_out,
            period_in,
            period_out,
        ))
    }

    /// One aggregate SUM over the pair's rows; absent rows count as zero.
    async fn sum(
        &self,
        facility_id: Uuid,
        chemical_id: Uuid,
        side: Side,
        window: Window,
    ) -> Result<Decimal, ReportError> {
        let facility_column = match side {
            Side::Incoming => transactions::Column::ToFacilityId,
            Side::Outgoing => transactions::Column::FromFacilityId,
        };

        let mut query = transactions::Entity::find()
            .select_only()
            .expr_as(
                Func::sum(Expr::col(transactions::Column::Quantity)),
                "total",
            )
            .filter(transactions::Column::ChemicalId.eq(chemical_id))
            .filter(facility_column.eq(facility_id));

        query = match window {
            Window::Before(start) => {
                query.filter(transactions::Column::OperationDate.lt(start))
            }
            Window::Within(start, end) => query
                .filter(transactions::Column::OperationDate.gte(start))
                .filter(transactions::Column::OperationDate.lte(end)),
        };

        let total: Option<Option<Decimal>> =
            query.into_tuple().one(&self.db).await?;

        Ok(total.flatten().unwrap_or(Decimal::ZERO))
    }
}
