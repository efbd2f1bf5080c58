//! Grouped operation routes: the only write path into the ledger.
//!
//! One request carries a shared header and any number of line items; the
//! whole group succeeds or fails together and balances are rebuilt in the
//! same database transaction.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, post, put},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::{error_response, forbidden}};
use chemstock_core::inventory::{
    InventoryError, OperationInput, OperationItemInput, TransactionType, normalize_facility_ref,
};
use chemstock_db::{
    OperationRepository,
    repositories::operation::OperationError,
};
use chemstock_shared::types::Role;

use super::transactions::TransactionResponse;

/// Creates the operation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/operations", post(create_operation))
        .route("/operations/{operation_uuid}", put(edit_operation))
        .route("/operations/{operation_uuid}", delete(delete_operation))
}

/// Request body for one line item.
#[derive(Debug, Deserialize)]
pub struct OperationItemRequest {
    /// The chemical being moved.
    pub chemical_id: Uuid,
    /// Quantity as submitted; validated as a positive two-decimal number.
    pub quantity: String,
}

/// Request body for creating or replacing an operation.
#[derive(Debug, Deserialize)]
pub struct OperationRequest {
    /// Movement kind.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Source facility reference; empty or "null" mean absent.
    pub from_facility: Option<String>,
    /// Destination facility reference; empty or "null" mean absent.
    pub to_facility: Option<String>,
    /// Logical effective time.
    pub operation_date: Option<DateTime<Utc>>,
    /// Free-form comment.
    pub comment: Option<String>,
    /// Attached document name.
    pub document_name: Option<String>,
    /// Opaque reference to an attached document blob.
    pub document_file: Option<String>,
    /// Line items, in submission order.
    #[serde(default)]
    pub items: Vec<OperationItemRequest>,
}

impl OperationRequest {
    /// Lowers the wire payload into the domain input, normalizing the
    /// facility references.
    fn into_input(self) -> Result<OperationInput, InventoryError> {
        let from_facility_id = normalize_facility_ref(self.from_facility.as_deref())?;
        let to_facility_id = normalize_facility_ref(self.to_facility.as_deref())?;

        Ok(OperationInput {
            transaction_type: self.transaction_type,
            from_facility_id,
            to_facility_id,
            operation_date: self.operation_date,
            comment: self.comment,
            document_name: self.document_name,
            document_file: self.document_file,
            items: self
                .items
                .into_iter()
                .map(|item| OperationItemInput {
                    chemical_id: item.chemical_id,
                    quantity: item.quantity,
                })
                .collect(),
        })
    }
}

fn map_inventory_error(err: &InventoryError) -> Response {
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

fn map_error(err: &OperationError) -> Response {
    if matches!(err, OperationError::Database(_)) {
        error!(error = %err, "Operation repository error");
    }
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

/// Rewriting history is reserved for admins and logisticians; engineers may
/// only append consume operations through the create route.
fn check_editor(auth: &AuthUser) -> Result<(), Response> {
    match auth.role() {
        Role::Admin | Role::Logistician => Ok(()),
        Role::Engineer => Err(forbidden(
            "Only admins and logisticians can edit or delete operations",
        )),
    }
}

/// POST `/operations` - Validate and persist one grouped operation.
async fn create_operation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<OperationRequest>,
) -> Response {
    let input = match payload.into_input() {
        Ok(input) => input,
        Err(e) => return map_inventory_error(&e),
    };

    let repo = OperationRepository::new((*state.db).clone());
    match repo.create_operation(input, &auth.acting_user()).await {
        Ok(rows) => {
            let items: Vec<TransactionResponse> = rows.into_iter().map(Into::into).collect();
            (StatusCode::CREATED, Json(items)).into_response()
        }
        Err(e) => map_error(&e),
    }
}

/// PUT `/operations/{operation_uuid}` - Replace an operation wholesale.
///
/// The replacement rows get a fresh operation id; an empty item list
/// deletes the operation instead.
async fn edit_operation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(operation_uuid): Path<Uuid>,
    Json(payload): Json<OperationRequest>,
) -> Response {
    if let Err(response) = check_editor(&auth) {
        return response;
    }

    let input = match payload.into_input() {
        Ok(input) => input,
        Err(e) => return map_inventory_error(&e),
    };

    let repo = OperationRepository::new((*state.db).clone());
    match repo
        .edit_operation(operation_uuid, input, &auth.acting_user())
        .await
    {
        Ok(outcome) => {
            let items: Vec<TransactionResponse> =
                outcome.rows.into_iter().map(Into::into).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "operation_uuid": outcome.operation_uuid,
                    "transactions": items,
                })),
            )
                .into_response()
        }
        Err(e) => map_error(&e),
    }
}

/// DELETE `/operations/{operation_uuid}` - Delete an operation.
async fn delete_operation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(operation_uuid): Path<Uuid>,
) -> Response {
    if let Err(response) = check_editor(&auth) {
        return response;
    }

    let repo = OperationRepository::new((*state.db).clone());
    match repo.delete_operation(operation_uuid).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_error(&e),
    }
}
