// Common test utilities for integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use starplus_inventory::{ApiServer, AppState, Config, DatabaseManager};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const ADMIN_NEW_PASSWORD: &str = "S3guraAdmin!";

/// Full router over a throwaway database file
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _dir: TempDir,
}

impl TestApp {
    /// Router with the bootstrap admin seeded, nothing else
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = Arc::new(
            DatabaseManager::new(&dir.path().join("test.db"), 4, Duration::from_secs(5))
                .expect("Failed to create test database"),
        );

        let mut config = Config::defaults().expect("Failed to load default config");
        config.security.bcrypt_cost = 4;

        let state = AppState::new(db, &config.security);
        state
            .auth_service
            .ensure_bootstrap_admin(ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .expect("Failed to seed admin");

        let router = ApiServer::with_state(&config, state.clone()).into_router();
        Self { router, state, _dir: dir }
    }

    /// Send one request and decode the JSON body (Null when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Complete the admin's mandatory change and return its token
    pub async fn admin_token(&self) -> String {
        let (status, pending) = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, session) = self
            .request(
                Method::POST,
                "/api/auth/change-password-mandatory",
                None,
                Some(serde_json::json!({
                    "id": pending["id"],
                    "currentPassword": ADMIN_PASSWORD,
                    "newPassword": ADMIN_NEW_PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        session["accessToken"].as_str().unwrap().to_string()
    }

    /// Register an account as admin, change its password, return its token
    pub async fn user_token(&self, admin_token: &str, username: &str, role: &str) -> String {
        let (status, created) = self
            .request(
                Method::POST,
                "/api/auth/register",
                Some(admin_token),
                Some(serde_json::json!({"username": username, "password": "inicial1", "role": role})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, session) = self
            .request(
                Method::POST,
                "/api/auth/change-password-mandatory",
                None,
                Some(serde_json::json!({
                    "id": created["user"]["_id"],
                    "currentPassword": "inicial1",
                    "newPassword": "definitiva1",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        session["accessToken"].as_str().unwrap().to_string()
    }
}

/// Id of a freshly created record, plain or wrapped in `{data}`
pub fn created_id(body: &Value) -> String {
    let record = if body.get("data").is_some() { &body["data"] } else { body };
    record["_id"].as_str().expect("created record has an _id").to_string()
}
