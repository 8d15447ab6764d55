//! Authentication API handlers

use crate::api::handlers::AppState;
use crate::api::models::JsonBody;
use crate::auth::middleware::AuthUser;
use crate::auth::models::{
    ChangePasswordRequest, LoginOutcome, LoginRequest, RegisterRequest, RegisterResponse,
    RoleUpdatedResponse, Session, UpdateRoleRequest, UserDeletedResponse, UsersResponse,
};
use crate::core::error::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// Handler for POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginOutcome>> {
    tracing::info!(username = %req.username, "Login attempt");
    Ok(Json(state.auth_service.login(req).await?))
}

/// Handler for POST /api/auth/change-password-mandatory
pub async fn change_password_mandatory(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> Result<Json<Session>> {
    Ok(Json(state.auth_service.change_password_mandatory(req).await?))
}

/// Handler for POST /api/auth/register (admin)
pub async fn register(
    State(state): State<AppState>,
    admin: AuthUser,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!(admin_id = %admin.id, username = ?req.username, "User registration attempt");
    let user = state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Usuario creado con éxito (por Admin).".to_string(),
            user,
        }),
    ))
}

/// Handler for GET /api/auth/users (admin)
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>> {
    let users = state.auth_service.list_users().await?;
    Ok(Json(UsersResponse { users }))
}

/// Handler for PUT /api/auth/users/:id (admin)
pub async fn update_user_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateRoleRequest>,
) -> Result<Json<RoleUpdatedResponse>> {
    let user = state.auth_service.update_role(&id, req.role.as_deref()).await?;

    Ok(Json(RoleUpdatedResponse {
        message: format!("Rol de {} actualizado a {}.", user.username, user.role),
        user,
    }))
}

/// Handler for DELETE /api/auth/users/:id (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserDeletedResponse>> {
    let user = state.auth_service.delete_user(&id, &admin.id).await?;

    Ok(Json(UserDeletedResponse {
        message: format!("Usuario {} (ID: {}) eliminado con éxito.", user.username, id),
        deleted_user_id: id,
    }))
}
