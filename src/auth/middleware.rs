//! Authentication and authorization middleware

use crate::api::handlers::AppState;
use crate::core::error::{InventoryError, Result};
use crate::db::models::Role;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

const MISSING_TOKEN: &str = "Acceso denegado. No se proporcionó Access Token.";

/// Roles allowed on read routes
pub const ANY_ROLE: &[Role] = &Role::ALL;

/// Roles allowed on write and administration routes
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Identity taken from a verified session token
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub role: Role,
}

/// Bearer token from the Authorization header, if well formed
///
/// The scheme name is matched case-insensitively.
fn bearer_token(request: &Request) -> Option<&str> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}

/// Authentication middleware
///
/// Missing token is a 401, a token that fails verification is a 403.
/// The store is never consulted.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = match bearer_token(&request) {
        Some(token) => match state.tokens.verify(token) {
            Ok(claims) => claims,
            Err(e) => return e.into_response(),
        },
        None => {
            return InventoryError::AuthenticationError(MISSING_TOKEN.to_string()).into_response();
        }
    };

    request.extensions_mut().insert(AuthUser {
        id: claims.id,
        role: claims.role,
    });

    next.run(request).await
}

/// Role check for a fixed role set; must run after [`authenticate`]
pub async fn authorize(allowed: &'static [Role], request: Request, next: Next) -> Response {
    let Some(user) = request.extensions().get::<AuthUser>() else {
        return InventoryError::PermissionDenied(
            "Autorización fallida: El rol no pudo ser verificado.".to_string(),
        )
        .into_response();
    };

    if !allowed.contains(&user.role) {
        tracing::warn!(user_id = %user.id, role = %user.role, "Role not allowed");
        let roles: Vec<&str> = allowed.iter().map(Role::as_str).collect();
        return InventoryError::PermissionDenied(format!(
            "Acceso prohibido. No tienes el nivel de permisos requerido ({}).",
            roles.join(", ")
        ))
        .into_response();
    }

    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = InventoryError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| InventoryError::AuthenticationError(MISSING_TOKEN.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::util::ServiceExt;

    fn guarded(allowed: &'static [Role], user: Option<AuthUser>) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .route_layer(middleware::from_fn(move |req: Request, next: Next| {
                authorize(allowed, req, next)
            }))
            .layer(middleware::from_fn(move |mut req: Request, next: Next| {
                let user = user.clone();
                async move {
                    if let Some(user) = user {
                        req.extensions_mut().insert(user);
                    }
                    next.run(req).await
                }
            }))
    }

    async fn status(router: Router) -> StatusCode {
        router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    fn user(role: Role) -> Option<AuthUser> {
        Some(AuthUser { id: "u1".into(), role })
    }

    #[tokio::test]
    async fn test_authorize_allows_listed_roles() {
        assert_eq!(status(guarded(ANY_ROLE, user(Role::User))).await, StatusCode::OK);
        assert_eq!(status(guarded(ADMIN_ONLY, user(Role::Admin))).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_authorize_rejects_other_roles() {
        assert_eq!(status(guarded(ADMIN_ONLY, user(Role::User))).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_authorize_without_identity_is_forbidden() {
        assert_eq!(status(guarded(ANY_ROLE, None)).await, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_bearer_token_parsing() {
        let req = |value: &str| {
            Request::builder()
                .header(header::AUTHORIZATION, value)
                .body(Body::empty())
                .unwrap()
        };

        assert_eq!(bearer_token(&req("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&req("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&req("BEARER  abc ")), Some("abc"));
        assert_eq!(bearer_token(&req("Bearerabc")), None);
        assert_eq!(bearer_token(&req("Bearer ")), None);
        assert_eq!(bearer_token(&req("Basic abc")), None);
        assert_eq!(bearer_token(&Request::new(Body::empty())), None);
    }
}
