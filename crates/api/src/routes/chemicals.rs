//! Chemical catalog routes.

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
    ChemicalRepository,
    entities::chemicals,
    repositories::chemical::{ChemicalError, ChemicalInput},
};

/// Creates the chemical routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/chemicals", get(list_chemicals).post(create_chemical))
        .route(
            "/chemicals/{id}",
            get(get_chemical).put(update_chemical).delete(delete_chemical),
        )
}

/// Request body for creating or updating a chemical.
#[derive(Debug, Deserialize)]
pub struct ChemicalRequest {
    /// Unique display name.
    pub name: String,
    /// Unit the quantities are expressed in (kg, l, t).
    pub unit_of_measurement: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Response for a chemical.
#[derive(Debug, Serialize)]
pub struct ChemicalResponse {
    /// Chemical ID.
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    /// Unit the quantities are expressed in.
    pub unit_of_measurement: String,
    /// Optional description.
    pub description: Option<String>,
}

impl From<chemicals::Model> for ChemicalResponse {
    fn from(model: chemicals::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            unit_of_measurement: model.unit_of_measurement,
            description: model.description,
        }
    }
}

fn map_error(err: &ChemicalError) -> Response {
    if matches!(err, ChemicalError::Database(_)) {
        error!(error = %err, "Chemical repository error");
    }
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

fn check_writer(auth: &AuthUser) -> Result<(), Response> {
    if auth.role().can_manage_reference_data() {
        Ok(())
    } else {
        Err(forbidden("Only admins and logisticians can manage chemicals"))
    }
}

/// GET `/chemicals` - List the catalog.
async fn list_chemicals(State(state): State<AppState>, _auth: AuthUser) -> Response {
    let repo = ChemicalRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(rows) => {
            let items: Vec<ChemicalResponse> = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => map_error(&e),
    }
}

/// GET `/chemicals/{id}` - Get one chemical.
async fn get_chemical(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Response {
    let repo = ChemicalRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(model) => (StatusCode::OK, Json(ChemicalResponse::from(model))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// POST `/chemicals` - Add a chemical to the catalog.
async fn create_chemical(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChemicalRequest>,
) -> Response {
    if let Err(response) = check_writer(&auth) {
        return response;
    }

    let repo = ChemicalRepository::new((*state.db).clone());
    match repo
        .create(ChemicalInput {
            name: payload.name,
            unit_of_measurement: payload.unit_of_measurement,
            description: payload.description,
        })
        .await
    {
        Ok(model) => (StatusCode::CREATED, Json(ChemicalResponse::from(model))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// PUT `/chemicals/{id}` - Update a chemical.
async fn update_chemical(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChemicalRequest>,
) -> Response {
    if let Err(response) = check_writer(&auth) {
        return response;
    }

    let repo = ChemicalRepository::new((*state.db).clone());
    match repo
        .update(
            id,
            ChemicalInput {
                name: payload.name,
                unit_of_measurement: payload.unit_of_measurement,
                description: payload.description,
            },
        )
        .await
    {
        Ok(model) => (StatusCode::OK, Json(ChemicalResponse::from(model))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// DELETE `/chemicals/{id}` - Remove an unreferenced chemical.
async fn delete_chemical(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(response) = check_writer(&auth) {
        return response;
    }

    let repo = ChemicalRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_error(&e),
    }
}
