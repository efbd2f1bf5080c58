//! Ledger listing routes.
//!
//! Read-only: rows only ever change through the operation routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::error_response};
use chemstock_db::{
    TransactionRepository,
    entities::{sea_orm_active_enums::TransactionType, transactions},
    repositories::transaction::{TransactionError, TransactionFilter},
};
use chemstock_shared::quantity::format_fixed;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transactions", get(list_transactions))
}

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by chemical.
    pub chemical: Option<Uuid>,
    /// Filter by movement kind.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Filter by facility on either side of the movement.
    pub facility: Option<Uuid>,
    /// Filter by logical operation group.
    pub operation: Option<Uuid>,
    /// Inclusive lower bound on the effective date.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the effective date.
    pub end_date: Option<DateTime<Utc>>,
}

/// Response for one ledger row.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Row ID.
    pub id: Uuid,
    /// Logical operation group.
    pub operation_uuid: Uuid,
    /// Movement kind.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Chemical moved.
    pub chemical_id: Uuid,
    /// Positive quantity, fixed two-decimal string.
    pub quantity: String,
    /// Source facility, if any.
    pub from_facility_id: Option<Uuid>,
    /// Destination facility, if any.
    pub to_facility_id: Option<Uuid>,
    /// User who submitted the operation, if still known.
    pub performed_by: Option<Uuid>,
    /// Logical effective time.
    pub operation_date: String,
    /// Record creation time.
    pub timestamp: String,
    /// Attached document name.
    pub document_name: Option<String>,
    /// Free-form comment.
    pub comment: Option<String>,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: model.id,
            operation_uuid: model.operation_uuid,
            transaction_type: model.transaction_type,
            chemical_id: model.chemical_id,
            quantity: format_fixed(model.quantity),
            from_facility_id: model.from_facility_id,
            to_facility_id: model.to_facility_id,
            performed_by: model.performed_by,
            operation_date: model.operation_date.to_rfc3339(),
            timestamp: model.timestamp.to_rfc3339(),
            document_name: model.document_name,
            comment: model.comment,
        }
    }
}

fn map_error(err: &TransactionError) -> Response {
    error!(error = %err, "Transaction repository error");
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

/// GET `/transactions` - List ledger rows, newest operations first.
async fn list_transactions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> Response {
    let repo = TransactionRepository::new((*state.db).clone());
    let filter = TransactionFilter {
        chemical_id: query.chemical,
        transaction_type: query.transaction_type,
        facility_id: query.facility,
        operation_uuid: query.operation,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    match repo.list(filter).await {
        Ok(rows) => {
            let items: Vec<TransactionResponse> = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => map_error(&e),
    }
}
