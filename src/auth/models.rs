//! Authentication request/response models

use crate::db::models::{Role, User};
use serde::{Deserialize, Serialize};

/// Register request (admin only)
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Login request
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Mandatory first-login password change
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub id: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Role update request
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Option<String>,
}

/// User as exposed by the API (never carries the hash)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub role: Role,
    pub must_change_password: bool,
    pub created_at: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            must_change_password: user.must_change_password,
            created_at: user.created_at,
        }
    }
}

/// Full session issued by login or by the mandatory change
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub access_token: String,
    pub id: String,
    pub role: Role,
    pub username: String,
    pub must_change_password: bool,
}

/// Login answer for an account still waiting for its first password change
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequired {
    pub message: String,
    pub must_change_password: bool,
    pub id: String,
}

/// Result of a successful credential check
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LoginOutcome {
    Session(Session),
    PasswordChangeRequired(PasswordChangeRequired),
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<PublicUser>,
}

#[derive(Debug, Serialize)]
pub struct RoleUpdatedResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDeletedResponse {
    pub message: String,
    pub deleted_user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_has_no_hash() {
        let user = User {
            id: "u1".into(),
            username: "alice".into(),
            password_hash: "$2b$04$secret".into(),
            role: Role::User,
            must_change_password: true,
            created_at: "2024-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();

        assert!(!json.contains("secret"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"_id\":\"u1\""));
        assert!(json.contains("\"mustChangePassword\":true"));
    }

    #[test]
    fn test_pending_login_has_no_token() {
        let outcome = LoginOutcome::PasswordChangeRequired(PasswordChangeRequired {
            message: "Acceso inicial. Debe cambiar su contraseña.".into(),
            must_change_password: true,
            id: "u1".into(),
        });
        let value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(value["mustChangePassword"], true);
        assert_eq!(value["id"], "u1");
        assert!(value.get("accessToken").is_none());
    }

    #[test]
    fn test_change_request_uses_camel_case() {
        let req: ChangePasswordRequest = serde_json::from_str(
            r#"{"id":"u1","currentPassword":"old","newPassword":"new"}"#,
        )
        .unwrap();
        assert_eq!(req.current_password.as_deref(), Some("old"));
        assert_eq!(req.new_password.as_deref(), Some("new"));
    }
}
