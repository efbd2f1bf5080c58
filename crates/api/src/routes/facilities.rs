//! Facility reference-data routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::{error_response, forbidden}};
use chemstock_db::{
    FacilityRepository,
    entities::{facilities, sea_orm_active_enums::FacilityType},
    repositories::facility::{FacilityError, FacilityInput},
};

/// Creates the facility routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/facilities", get(list_facilities).post(create_facility))
        .route(
            "/facilities/{id}",
            get(get_facility).put(update_facility).delete(delete_facility),
        )
}

/// Request body for creating or updating a facility.
#[derive(Debug, Deserialize)]
pub struct FacilityRequest {
    /// Display name.
    pub name: String,
    /// Kind of storage location.
    pub facility_type: FacilityType,
    /// Optional free-form location description.
    pub location: Option<String>,
}

/// Response for a facility.
#[derive(Debug, Serialize)]
pub struct FacilityResponse {
    /// Facility ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Kind of storage location.
    pub facility_type: FacilityType,
    /// Optional free-form location description.
    pub location: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<facilities::Model> for FacilityResponse {
    fn from(model: facilities::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            facility_type: model.facility_type,
            location: model.location,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

fn map_error(err: &FacilityError) -> Response {
    if matches!(err, FacilityError::Database(_)) {
        error!(error = %err, "Facility repository error");
    }
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

/// Reference data writes are reserved for admins and logisticians.
fn check_writer(auth: &AuthUser) -> Result<(), Response> {
    if auth.role().can_manage_reference_data() {
        Ok(())
    } else {
        Err(forbidden("Only admins and logisticians can manage facilities"))
    }
}

/// GET `/facilities` - List all facilities.
async fn list_facilities(State(state): State<AppState>, _auth: AuthUser) -> Response {
    let repo = FacilityRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(rows) => {
            let items: Vec<FacilityResponse> = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => map_error(&e),
    }
}

/// GET `/facilities/{id}` - Get one facility.
async fn get_facility(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Response {
    let repo = FacilityRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(model) => (StatusCode::OK, Json(FacilityResponse::from(model))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// POST `/facilities` - Create a facility.
async fn create_facility(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<FacilityRequest>,
) -> Response {
    if let Err(response) = check_writer(&auth) {
        return response;
    }

    let repo = FacilityRepository::new((*state.db).clone());
    match repo
        .create(FacilityInput {
            name: payload.name,
            facility_type: payload.facility_type,
            location: payload.location,
        })
        .await
    {
        Ok(model) => (StatusCode::CREATED, Json(FacilityResponse::from(model))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// PUT `/facilities/{id}` - Update a facility.
async fn update_facility(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FacilityRequest>,
) -> Response {
    if let Err(response) = check_writer(&auth) {
        return response;
    }

    let repo = FacilityRepository::new((*state.db).clone());
    match repo
        .update(
            id,
            FacilityInput {
                name: payload.name,
                facility_type: payload.facility_type,
                location: payload.location,
            },
        )
        .await
    {
        Ok(model) => (StatusCode::OK, Json(FacilityResponse::from(model))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// DELETE `/facilities/{id}` - Delete a facility without stock.
async fn delete_facility(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(response) = check_writer(&auth) {
        return response;
    }

    let repo = FacilityRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_error(&e),
    }
}
