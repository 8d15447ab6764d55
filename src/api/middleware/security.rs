use crate::core::config::SecurityConfig;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Security headers middleware
///
/// Adds to every response:
/// - X-Content-Type-Options: nosniff
/// - X-Frame-Options: DENY
/// - Referrer-Policy: no-referrer
/// - Content-Security-Policy locked down for a JSON-only API
/// - Cache-Control: no-store (responses may carry tokens or inventory data)
/// - Strict-Transport-Security when enabled in configuration
pub async fn security_headers_middleware(
    State(config): State<SecurityHeadersConfig>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(header::REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers
        .entry(header::CACHE_CONTROL)
        .or_insert(HeaderValue::from_static("no-store"));

    if let Some(value) = config.hsts_header() {
        headers.insert(header::STRICT_TRANSPORT_SECURITY, value);
    }

    response
}

/// Configuration for security headers
#[derive(Clone, Debug)]
pub struct SecurityHeadersConfig {
    /// Enable HSTS (HTTP Strict Transport Security) header
    pub enable_hsts: bool,
    /// HSTS max-age in seconds
    pub hsts_max_age: u64,
}

impl SecurityHeadersConfig {
    pub fn new(enable_hsts: bool, hsts_max_age: u64) -> Self {
        Self {
            enable_hsts,
            hsts_max_age,
        }
    }

    fn hsts_header(&self) -> Option<HeaderValue> {
        if !self.enable_hsts {
            return None;
        }
        HeaderValue::from_str(&format!("max-age={}; includeSubDomains", self.hsts_max_age)).ok()
    }
}

impl From<&SecurityConfig> for SecurityHeadersConfig {
    fn from(config: &SecurityConfig) -> Self {
        Self::new(config.enable_hsts, config.hsts_max_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::util::ServiceExt;

    async fn call(config: SecurityHeadersConfig) -> Response {
        let app = Router::new()
            .route("/test", get(|| async { "OK" }))
            .layer(middleware::from_fn_with_state(config, security_headers_middleware));

        app.oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_baseline_headers_present() {
        let response = call(SecurityHeadersConfig::new(false, 0)).await;
        let headers = response.headers();

        assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
        assert!(headers
            .get(header::CONTENT_SECURITY_POLICY)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("frame-ancestors 'none'"));
        assert!(!headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
    }

    #[tokio::test]
    async fn test_hsts_uses_configured_max_age() {
        let response = call(SecurityHeadersConfig::new(true, 86400)).await;
        let hsts = response
            .headers()
            .get(header::STRICT_TRANSPORT_SECURITY)
            .unwrap()
            .to_str()
            .unwrap();

        assert!(hsts.contains("max-age=86400"));
        assert!(hsts.contains("includeSubDomains"));
    }
}
