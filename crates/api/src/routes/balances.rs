//! Cached balance routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::error_response};
use chemstock_db::{
    BalanceRepository,
    entities::balances,
    repositories::balance::{BalanceError, BalanceFilter},
};
use chemstock_shared::quantity::format_fixed;

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/balances", get(list_balances))
}

/// Query parameters for listing balances.
#[derive(Debug, Deserialize)]
pub struct ListBalancesQuery {
    /// Filter by facility.
    pub facility: Option<Uuid>,
    /// Filter by chemical.
    pub chemical: Option<Uuid>,
}

/// Response for one cached balance.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Facility.
    pub facility_id: Uuid,
    /// Chemical.
    pub chemical_id: Uuid,
    /// Current stock level, fixed two-decimal string. May be negative.
    pub quantity: String,
    /// When the cache row was last rebuilt.
    pub updated_at: String,
}

impl From<balances::Model> for BalanceResponse {
    fn from(model: balances::Model) -> Self {
        Self {
            facility_id: model.facility_id,
            chemical_id: model.chemical_id,
            quantity: format_fixed(model.quantity),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

fn map_error(err: &BalanceError) -> Response {
    error!(error = %err, "Balance repository error");
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

/// GET `/balances` - List cached balances, optionally filtered.
async fn list_balances(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListBalancesQuery>,
) -> Response {
    let repo = BalanceRepository::new((*state.db).clone());
    match repo
        .list(BalanceFilter {
            facility_id: query.facility,
            chemical_id: query.chemical,
        })
        .await
    {
        Ok(rows) => {
            let items: Vec<BalanceResponse> = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => map_error(&e),
    }
}
