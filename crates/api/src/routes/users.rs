//! User listing routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::{error_response, forbidden}};
use chemstock_db::{
    UserRepository,
    entities::{sea_orm_active_enums::UserRole, users},
    repositories::user::UserError,
};
use chemstock_shared::types::Role;

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

/// Response for a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Role.
    pub role: UserRole,
    /// Facility the user is assigned to, if any.
    pub assigned_facility_id: Option<Uuid>,
}

impl From<users::Model> for UserResponse {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            role: model.role,
            assigned_facility_id: model.assigned_facility_id,
        }
    }
}

fn map_error(err: &UserError) -> Response {
    if matches!(err, UserError::Database(_)) {
        error!(error = %err, "User repository error");
    }
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

/// GET `/users` - List users. Admin only.
async fn list_users(State(state): State<AppState>, auth: AuthUser) -> Response {
    if auth.role() != Role::Admin {
        return forbidden("Only admins can list users");
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(rows) => {
            let items: Vec<UserResponse> = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => map_error(&e),
    }
}
