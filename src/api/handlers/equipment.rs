//! Equipment handlers (`/api/equipos`)

use crate::api::handlers::AppState;
use crate::api::models::{DataResponse, DeletedResponse, EquipmentInput, JsonBody, QuoteRequest};
use crate::core::error::{InventoryError, Result};
use crate::core::quote::Quote;
use crate::db::models::Equipment;
use crate::db::repository::Repository;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

fn not_found() -> InventoryError {
    InventoryError::NotFound("Equipo no encontrado.".to_string())
}

/// Handler for GET /api/equipos
pub async fn list_equipment(State(state): State<AppState>) -> Result<Json<Vec<Equipment>>> {
    Ok(Json(state.equipment_repo.find_all().await?))
}

/// Handler for GET /api/equipos/:id
pub async fn get_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Equipment>> {
    state
        .equipment_repo
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// Handler for POST /api/equipos
pub async fn create_equipment(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<EquipmentInput>,
) -> Result<impl IntoResponse> {
    let equipment = input.into_equipment()?;
    state.equipment_repo.create(&equipment).await?;

    tracing::info!(
        equipment_id = %equipment.id,
        name = %equipment.name,
        price = equipment.price,
        "Equipment created"
    );
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Handler for PUT /api/equipos/:id
pub async fn update_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<EquipmentInput>,
) -> Result<Json<DataResponse<Equipment>>> {
    let mut equipment = state
        .equipment_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(not_found)?;

    input.apply_to(&mut equipment)?;
    if !state.equipment_repo.update(&equipment).await? {
        return Err(not_found());
    }

    tracing::info!(equipment_id = %equipment.id, "Equipment updated");
    Ok(Json(DataResponse::new(equipment)))
}

/// Handler for DELETE /api/equipos/:id
pub async fn delete_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>> {
    if !state.equipment_repo.delete(&id).await? {
        return Err(not_found());
    }

    tracing::info!(equipment_id = %id, "Equipment deleted");
    Ok(Json(DeletedResponse {
        message: "Equipo eliminado con éxito.".to_string(),
        deleted_id: id,
    }))
}

/// Handler for POST /api/equipos/cotizacion
pub async fn quote_equipment(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<QuoteRequest>,
) -> Result<Json<Quote>> {
    Ok(Json(state.quote_service.quote(&req.equipment_ids).await?))
}
