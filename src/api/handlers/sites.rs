//! Tower (`/api/torres`) and server (`/api/servidores`) handlers
//!
//! Both collections share one set of handlers, parameterized by a marker
//! type naming the collection.

use crate::api::handlers::AppState;
use crate::api::models::{DataResponse, DeletedResponse, JsonBody, SiteInput};
use crate::core::error::{InventoryError, Result};
use crate::db::models::Site;
use crate::db::repository::{Repository, SiteKind};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// Marker for a site collection exposed over HTTP
pub trait SiteCollection: Send + Sync + 'static {
    const KIND: SiteKind;
}

pub struct Towers;
pub struct Servers;

impl SiteCollection for Towers {
    const KIND: SiteKind = SiteKind::Tower;
}

impl SiteCollection for Servers {
    const KIND: SiteKind = SiteKind::Server;
}

fn not_found(kind: SiteKind) -> InventoryError {
    InventoryError::NotFound(kind.not_found_message().to_string())
}

/// Handler for GET /api/{torres,servidores}
pub async fn list_sites<C: SiteCollection>(
    State(state): State<AppState>,
) -> Result<Json<Vec<Site>>> {
    let sites = state.sites(C::KIND).find_all().await?;
    tracing::debug!(kind = ?C::KIND, count = sites.len(), "Listing sites");
    Ok(Json(sites))
}

/// Handler for GET /api/{torres,servidores}/:id
pub async fn get_site<C: SiteCollection>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Site>> {
    state
        .sites(C::KIND)
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(C::KIND))
}

/// Handler for POST /api/{torres,servidores}
pub async fn create_site<C: SiteCollection>(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SiteInput>,
) -> Result<impl IntoResponse> {
    let site = input.into_site()?;
    state.sites(C::KIND).create(&site).await?;

    tracing::info!(kind = ?C::KIND, site_id = %site.id, name = %site.name, "Site created");
    Ok((StatusCode::CREATED, Json(site)))
}

/// Handler for PUT /api/{torres,servidores}/:id
pub async fn update_site<C: SiteCollection>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<SiteInput>,
) -> Result<Json<DataResponse<Site>>> {
    let repo = state.sites(C::KIND);
    let mut site = repo.find_by_id(&id).await?.ok_or_else(|| not_found(C::KIND))?;

    input.apply_to(&mut site)?;
    if !repo.update(&site).await? {
        return Err(not_found(C::KIND));
    }

    tracing::info!(kind = ?C::KIND, site_id = %site.id, "Site updated");
    Ok(Json(DataResponse::new(site)))
}

/// Handler for DELETE /api/{torres,servidores}/:id
///
/// Dashboard cards pointing at the site are left as they are.
pub async fn delete_site<C: SiteCollection>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>> {
    if !state.sites(C::KIND).delete(&id).await? {
        return Err(not_found(C::KIND));
    }

    tracing::info!(kind = ?C::KIND, site_id = %id, "Site deleted");
    Ok(Json(DeletedResponse {
        message: C::KIND.deleted_message().to_string(),
        deleted_id: id,
    }))
}
