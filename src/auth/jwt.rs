//! JWT session token issuing and validation

use crate::core::error::{InventoryError, Result};
use crate::db::models::Role;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 token issuer bound to the process secret
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a session token valid from now
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String> {
        self.issue_at(user_id, role, chrono::Utc::now().timestamp())
    }

    /// Issue a session token as if it had been created at `issued_at` (unix seconds)
    pub fn issue_at(&self, user_id: &str, role: Role, issued_at: i64) -> Result<String> {
        let exp = issued_at
            .checked_add(self.ttl_secs)
            .ok_or_else(|| InventoryError::TokenError("Token expiry out of range".to_string()))?;
        let claims = Claims {
            id: user_id.to_string(),
            role,
            iat: issued_at,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| InventoryError::TokenError(format!("Failed to generate token: {}", e)))
    }

    /// Validate a token and extract its claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                InventoryError::PermissionDenied("Access Token inválido o expirado.".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new("secret", 3600);
        let token = issuer.issue("u1", Role::Admin).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.id, "u1");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issuer = TokenIssuer::new("secret", 3600);
        let issued_at = chrono::Utc::now().timestamp() - 3601;
        let token = issuer.issue_at("u1", Role::User, issued_at).unwrap();

        let err = issuer.verify(&token).unwrap_err();
        assert!(matches!(err, InventoryError::PermissionDenied(_)));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let ours = TokenIssuer::new("secret", 3600);
        let theirs = TokenIssuer::new("other-secret", 3600);
        let token = theirs.issue("u1", Role::Admin).unwrap();

        assert!(ours.verify(&token).is_err());
        assert!(ours.verify("not.a.token").is_err());
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let issuer = TokenIssuer::new("secret", i64::MAX);
        let err = issuer.issue_at("u1", Role::User, 1_700_000_000).unwrap_err();
        assert!(matches!(err, InventoryError::TokenError(_)));
    }
}
