//! Account workflows: registration, login, mandatory password change and
//! administration of existing users.
//!
//! Hashing happens here and only here; the repository stores whatever hash
//! it is handed.

use crate::auth::jwt::TokenIssuer;
use crate::auth::models::{
    ChangePasswordRequest, LoginOutcome, LoginRequest, PasswordChangeRequired, PublicUser,
    RegisterRequest, Session,
};
use crate::auth::password::PasswordHasher;
use crate::core::error::{InventoryError, Result};
use crate::db::models::{now_timestamp, Role, User};
use crate::db::repository::{Repository, UserRepository};
use std::sync::Arc;
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Usuario o contraseña incorrectos.";
const MISSING_FIELDS: &str = "Todos los campos son obligatorios.";
const INVALID_ROLE: &str = "Rol inválido.";
const USER_NOT_FOUND: &str = "Usuario no encontrado.";

/// Non-blank value of an optional request field
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_role(value: Option<&str>) -> Result<Role> {
    value
        .and_then(|r| r.parse().ok())
        .ok_or_else(|| InventoryError::ValidationError(INVALID_ROLE.to_string()))
}

pub struct AuthService {
    users: Arc<UserRepository>,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(users: Arc<UserRepository>, hasher: PasswordHasher, tokens: Arc<TokenIssuer>) -> Self {
        Self { users, hasher, tokens }
    }

    /// Create an account that must change its password on first login
    pub async fn register(&self, req: RegisterRequest) -> Result<PublicUser> {
        let (username, password, role) = match (
            required(req.username),
            required(req.password),
            required(req.role),
        ) {
            (Some(u), Some(p), Some(r)) => (u.trim().to_string(), p, r),
            _ => return Err(InventoryError::ValidationError(MISSING_FIELDS.to_string())),
        };
        let role = parse_role(Some(role.as_str()))?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(InventoryError::DuplicateUsername(
                "El nombre de usuario ya existe.".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash: self.hasher.hash(&password).await?,
            role,
            must_change_password: true,
            created_at: now_timestamp(),
        };
        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, role = %user.role, "User registered");
        Ok(user.into())
    }

    /// Check credentials; accounts with a pending change get no token
    pub async fn login(&self, req: LoginRequest) -> Result<LoginOutcome> {
        let invalid = || InventoryError::AuthenticationError(INVALID_CREDENTIALS.to_string());

        let user = self
            .users
            .find_by_username(req.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !self.hasher.verify(&req.password, &user.password_hash).await? {
            tracing::warn!(username = %user.username, "Invalid password");
            return Err(invalid());
        }

        if user.must_change_password {
            tracing::info!(user_id = %user.id, "Login pending mandatory password change");
            return Ok(LoginOutcome::PasswordChangeRequired(PasswordChangeRequired {
                message: "Acceso inicial. Debe cambiar su contraseña.".to_string(),
                must_change_password: true,
                id: user.id,
            }));
        }

        tracing::info!(user_id = %user.id, username = %user.username, "Login successful");
        Ok(LoginOutcome::Session(self.session(user, None)?))
    }

    /// Replace the initial password and hand out a normal session
    pub async fn change_password_mandatory(&self, req: ChangePasswordRequest) -> Result<Session> {
        let (id, current, new) = match (
            required(req.id),
            required(req.current_password),
            required(req.new_password),
        ) {
            (Some(i), Some(c), Some(n)) => (i, c, n),
            _ => return Err(InventoryError::ValidationError(MISSING_FIELDS.to_string())),
        };

        let mut user = self
            .users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| InventoryError::NotFound(USER_NOT_FOUND.to_string()))?;

        if !self.hasher.verify(&current, &user.password_hash).await? {
            return Err(InventoryError::AuthenticationError(
                "Contraseña actual incorrecta.".to_string(),
            ));
        }

        if self.hasher.verify(&new, &user.password_hash).await? {
            return Err(InventoryError::ValidationError(
                "La nueva contraseña no puede ser igual a la anterior.".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(&new).await?;
        if !self.users.complete_password_change(&user.id, &password_hash).await? {
            return Err(InventoryError::NotFound(USER_NOT_FOUND.to_string()));
        }
        user.password_hash = password_hash;
        user.must_change_password = false;

        tracing::info!(user_id = %user.id, "Mandatory password change completed");
        self.session(
            user,
            Some("Contraseña actualizada exitosamente. Acceso concedido.".to_string()),
        )
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>> {
        Ok(self
            .users
            .find_all()
            .await?
            .into_iter()
            .map(PublicUser::from)
            .collect())
    }

    pub async fn update_role(&self, id: &str, role: Option<&str>) -> Result<PublicUser> {
        let role = parse_role(role)?;

        if !self.users.update_role(id, role).await? {
            return Err(InventoryError::NotFound(USER_NOT_FOUND.to_string()));
        }

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| InventoryError::NotFound(USER_NOT_FOUND.to_string()))?;

        tracing::info!(user_id = %user.id, role = %user.role, "Role updated");
        Ok(user.into())
    }

    /// Delete an account other than the requester's own
    pub async fn delete_user(&self, id: &str, requester_id: &str) -> Result<PublicUser> {
        if id == requester_id {
            return Err(InventoryError::PermissionDenied(
                "No puedes eliminar tu propia cuenta de administrador desde este panel.".to_string(),
            ));
        }

        let not_found = || InventoryError::NotFound("Usuario no encontrado para eliminar.".to_string());
        let user = self.users.find_by_id(id).await?.ok_or_else(not_found)?;

        if !self.users.delete(id).await? {
            return Err(not_found());
        }

        tracing::info!(user_id = %id, deleted_by = %requester_id, "User deleted");
        Ok(user.into())
    }

    /// Seed the first administrator when no account exists yet
    pub async fn ensure_bootstrap_admin(&self, username: &str, password: &str) -> Result<bool> {
        if self.users.count().await? > 0 {
            return Ok(false);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.trim().to_string(),
            password_hash: self.hasher.hash(password).await?,
            role: Role::Admin,
            must_change_password: true,
            created_at: now_timestamp(),
        };
        self.users.create(&user).await?;

        tracing::warn!(username = %user.username, "Bootstrap admin created; password change required on first login");
        Ok(true)
    }

    fn session(&self, user: User, message: Option<String>) -> Result<Session> {
        Ok(Session {
            message,
            access_token: self.tokens.issue(&user.id, user.role)?,
            id: user.id,
            role: user.role,
            username: user.username,
            must_change_password: false,
        })
    }
}
