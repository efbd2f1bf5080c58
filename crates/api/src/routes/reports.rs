//! Period report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::error_response};
use chemstock_db::{ReportRepository, repositories::report::ReportError};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/inventory-period", get(inventory_period))
}

/// Query parameters for the period report. All four are required.
#[derive(Debug, Deserialize)]
pub struct InventoryPeriodQuery {
    /// Facility to report on.
    pub facility: Option<Uuid>,
    /// Chemical to report on.
    pub chemical: Option<Uuid>,
    /// Inclusive window start.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive window end.
    pub end_date: Option<DateTime<Utc>>,
}

fn map_error(err: &ReportError) -> Response {
    error!(error = %err, "Report repository error");
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

fn missing(field: &str) -> Response {
    error_response(
        400,
        "MISSING_FIELD",
        &format!("Required parameter missing: {field}"),
    )
}

/// GET `/reports/inventory-period` - Opening/closing balances and totals
/// for one facility, chemical and inclusive date window.
async fn inventory_period(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<InventoryPeriodQuery>,
) -> Response {
    let Some(facility) = query.facility else {
        return missing("facility");
    };
    let Some(chemical) = query.chemical else {
        return missing("chemical");
    };
    let Some(start_date) = query.start_date else {
        return missing("start_date");
    };
    let Some(end_date) = query.end_date else {
        return missing("end_date");
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo
        .inventory_period(facility, chemical, start_date, end_date)
        .await
    {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => map_error(&e),
    }
}
