//! Dashboard card handlers (`/api/dashboard`)

use crate::api::handlers::AppState;
use crate::api::models::{CardInput, DataResponse, DeletedResponse, JsonBody, PopulatedCard};
use crate::auth::AuthUser;
use crate::core::error::{InventoryError, Result};
use crate::db::models::{DashboardCard, Site};
use crate::db::repository::Repository;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;

fn not_found() -> InventoryError {
    InventoryError::NotFound("Card Button no encontrado.".to_string())
}

async fn find_site(
    repo: &impl Repository<Site>,
    id: Option<&str>,
) -> Result<Option<Site>> {
    match id {
        Some(id) => repo.find_by_id(id).await,
        None => Ok(None),
    }
}

/// Resolve the card's references; dangling ones drop out
async fn populate(state: &AppState, card: DashboardCard) -> Result<PopulatedCard> {
    let tower = find_site(state.tower_repo.as_ref(), card.tower_id.as_deref()).await?;
    let server = find_site(state.server_repo.as_ref(), card.server_id.as_deref()).await?;

    let mut found: HashMap<String, _> = state
        .equipment_repo
        .find_many(&card.equipment_ids)
        .await?
        .into_iter()
        .map(|e| (e.id.clone(), e))
        .collect();
    let equipment = card
        .equipment_ids
        .iter()
        .filter_map(|id| found.remove(id))
        .collect();

    Ok(PopulatedCard::new(card, tower, server, equipment))
}

/// Handler for GET /api/dashboard
pub async fn list_cards(State(state): State<AppState>) -> Result<Json<Vec<PopulatedCard>>> {
    let cards = state.dashboard_repo.find_all().await?;

    let mut populated = Vec::with_capacity(cards.len());
    for card in cards {
        populated.push(populate(&state, card).await?);
    }

    Ok(Json(populated))
}

/// Handler for GET /api/dashboard/:id
pub async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PopulatedCard>> {
    let card = state
        .dashboard_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(populate(&state, card).await?))
}

/// Handler for POST /api/dashboard
pub async fn create_card(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(input): JsonBody<CardInput>,
) -> Result<impl IntoResponse> {
    let card = input.into_card(&user.id)?;
    state.dashboard_repo.create(&card).await?;

    tracing::info!(card_id = %card.id, created_by = %user.id, "Dashboard card created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message("Card Button creado con éxito.", card)),
    ))
}

/// Handler for PUT /api/dashboard/:id
pub async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<CardInput>,
) -> Result<Json<DataResponse<DashboardCard>>> {
    let mut card = state
        .dashboard_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(not_found)?;

    input.apply_to(&mut card)?;
    if !state.dashboard_repo.update(&card).await? {
        return Err(not_found());
    }

    tracing::info!(card_id = %card.id, "Dashboard card updated");
    Ok(Json(DataResponse::with_message(
        "Card Button actualizado con éxito.",
        card,
    )))
}

/// Handler for DELETE /api/dashboard/:id
pub async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>> {
    if !state.dashboard_repo.delete(&id).await? {
        return Err(not_found());
    }

    tracing::info!(card_id = %id, "Dashboard card deleted");
    Ok(Json(DeletedResponse {
        message: "Card Button eliminado con éxito.".to_string(),
        deleted_id: id,
    }))
}
