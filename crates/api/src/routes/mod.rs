//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod balances;
pub mod chemicals;
pub mod facilities;
pub mod health;
pub mod operations;
pub mod reports;
pub mod transactions;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(facilities::routes())
        .merge(chemicals::routes())
        .merge(users::routes())
        .merge(balances::routes())
        .merge(transactions::routes())
        .merge(operations::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Builds the standard error envelope.
pub(crate) fn error_response(status: u16, code: &str, message: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "error": code, "message": message })),
    )
        .into_response()
}

/// 403 envelope for role-gated routes.
pub(crate) fn forbidden(message: &str) -> Response {
    error_response(403, "PERMISSION_DENIED", message)
}
