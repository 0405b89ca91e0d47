//! Extension traits for `axum::Router` to easily apply middleware layers.

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;

use crate::middleware::error_handling::{catch_panic, handle_error};
use crate::middleware::observability::{
    create_propagate_request_id_layer, create_request_id_layer, create_sensitive_headers_layer,
    create_trace_layer,
};
use crate::middleware::security::{
    CorsConfig, DEFAULT_MAX_BODY_SIZE, SecurityHeadersConfig, create_body_limit_layer,
    create_cors_layer,
};

/// Extension trait for `axum::`[`Router`] for layering middleware.
///
/// This trait provides convenient methods to add common middleware stacks
/// to your Axum router in a composable way.
pub trait RouterExt<S> {
    /// Layers [`HandleError`], [`CatchPanic`] and [`Timeout`] middlewares.
    ///
    /// This middleware stack handles various error conditions:
    /// - Request timeouts
    /// - Panics in handlers
    /// - Tower service errors
    ///
    /// # Arguments
    ///
    /// * `timeout` - Maximum duration to wait for a request to complete
    ///
    /// [`HandleError`]: axum::error_handling::HandleErrorLayer
    /// [`CatchPanic`]: tower_http::catch_panic::CatchPanicLayer
    /// [`Timeout`]: tower::timeout::TimeoutLayer
    fn with_error_handling_layer(self, timeout: Duration) -> Self;

    /// Layers [`SetRequestId`], [`Trace`] and [`PropagateRequestId`] middlewares.
    ///
    /// This middleware stack provides observability features:
    /// - Generates unique request IDs
    /// - Adds structured logging for requests
    /// - Propagates request IDs through the request lifecycle
    /// - Marks sensitive headers for redaction
    ///
    /// [`SetRequestId`]: tower_http::request_id::SetRequestIdLayer
    /// [`Trace`]: tower_http::trace::TraceLayer
    /// [`PropagateRequestId`]: tower_http::request_id::PropagateRequestIdLayer
    fn with_observability_layer(self) -> Self;

    /// Layers security middlewares including CORS, security headers, compression, and body limits.
    ///
    /// This middleware stack provides comprehensive security features:
    /// - CORS (Cross-Origin Resource Sharing) configuration
    /// - Security headers (HSTS, CSP, X-Frame-Options, etc.)
    /// - Response compression
    /// - Request body size limiting
    ///
    /// # Arguments
    ///
    /// * `cors_config` - CORS configuration
    /// * `security_config` - Security headers configuration
    /// * `max_body_bytes` - Maximum allowed request body size in bytes
    fn with_security_layer(
        self,
        cors_config: CorsConfig,
        security_config: SecurityHeadersConfig,
        max_body_bytes: usize,
    ) -> Self;

    /// Layers security middlewares with default configurations.
    ///
    /// This is a convenience method that uses default security settings.
    /// For production use, prefer `with_security_layer` with custom configs.
    fn with_default_security_layer(self) -> Self;
}

impl<S> RouterExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_error_handling_layer(self, timeout: Duration) -> Self {
        let middlewares = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_error))
            .layer(CatchPanicLayer::custom(catch_panic))
            .layer(TimeoutLayer::new(timeout));

        self.layer(middlewares)
    }

    fn with_observability_layer(self) -> Self {
        // Apply layers in reverse order (last layer wraps first)
        self.layer(create_propagate_request_id_layer())
            .layer(create_sensitive_headers_layer())
            .layer(create_trace_layer())
            .layer(create_request_id_layer())
    }

    fn with_security_layer(
        self,
        cors_config: CorsConfig,
        security_config: SecurityHeadersConfig,
        max_body_bytes: usize,
    ) -> Self {
        use axum::http::header::{self, HeaderValue};
        use tower_http::set_header::SetResponseHeaderLayer;

        let cors = create_cors_layer(&cors_config);

        // Apply layers individually to avoid complex type issues
        let mut router = self
            .layer(create_body_limit_layer(max_body_bytes))
            .layer(CompressionLayer::new())
            .layer(cors)
            .layer(SetResponseHeaderLayer::overriding(
                header::STRICT_TRANSPORT_SECURITY,
                HeaderValue::from_str(&security_config.hsts_header_value()).unwrap(),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static(security_config.frame_options_value()),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::REFERRER_POLICY,
                HeaderValue::from_static(security_config.referrer_policy_value()),
            ));

        // Add CSP if configured
        if let Some(csp) = security_config.csp_header_value() {
            router = router.layer(SetResponseHeaderLayer::overriding(
                header::CONTENT_SECURITY_POLICY,
                HeaderValue::from_str(csp).unwrap(),
            ));
        }

        router
    }

    fn with_default_security_layer(self) -> Self {
        let cors_config = CorsConfig::default();
        let security_config = SecurityHeadersConfig::default();
        self.with_security_layer(cors_config, security_config, DEFAULT_MAX_BODY_SIZE)
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use axum::Router;
    use axum::http::header::ORIGIN;
    use axum::http::{HeaderValue, StatusCode};
    use axum::routing::{get, post};
    use axum_test::TestServer;

    use super::*;

    async fn ok_handler() -> &'static str {
        "ok"
    }

    async fn panicking_handler() -> &'static str {
        panic!("handler exploded")
    }

    async fn slow_handler() -> &'static str {
        tokio::time::sleep(Duration::from_millis(500)).await;
        "done"
    }

    async fn echo_handler(body: String) -> String {
        body
    }

    #[tokio::test]
    async fn panics_become_internal_errors() -> anyhow::Result<()> {
        let app: Router<()> = Router::new()
            .route("/panic", get(panicking_handler))
            .with_error_handling_layer(Duration::from_secs(1));
        let server = TestServer::new(app)?;

        let response = server.get("/panic").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().contains("internal_server_error"));

        Ok(())
    }

    #[tokio::test]
    async fn slow_requests_time_out() -> anyhow::Result<()> {
        let app: Router<()> = Router::new()
            .route("/slow", get(slow_handler))
            .with_error_handling_layer(Duration::from_millis(50));
        let server = TestServer::new(app)?;

        let response = server.get("/slow").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().contains("Request timeout"));

        Ok(())
    }

    #[tokio::test]
    async fn security_headers_are_set() -> anyhow::Result<()> {
        let app: Router<()> = Router::new()
            .route("/", get(ok_handler))
            .with_default_security_layer();
        let server = TestServer::new(app)?;

        let response = server.get("/").await;
        response.assert_status_ok();
        assert_eq!(response.header("x-content-type-options"), "nosniff");
        assert_eq!(response.header("x-frame-options"), "DENY");
        assert!(!response.header("strict-transport-security").is_empty());
        assert!(!response.header("content-security-policy").is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected() -> anyhow::Result<()> {
        let app: Router<()> = Router::new().route("/echo", post(echo_handler)).with_security_layer(
            CorsConfig::default(),
            SecurityHeadersConfig::default(),
            1024,
        );
        let server = TestServer::new(app)?;

        let response = server.post("/echo").text("x".repeat(4096)).await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);

        Ok(())
    }

    #[tokio::test]
    async fn allowed_origins_receive_cors_headers() -> anyhow::Result<()> {
        let app: Router<()> = Router::new()
            .route("/", get(ok_handler))
            .with_default_security_layer();
        let server = TestServer::new(app)?;

        let response = server
            .get("/")
            .add_header(ORIGIN, HeaderValue::from_static("http://localhost:3000"))
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.header("access-control-allow-origin"),
            "http://localhost:3000"
        );

        Ok(())
    }

    #[tokio::test]
    async fn request_ids_propagate_to_responses() -> anyhow::Result<()> {
        let app: Router<()> = Router::new()
            .route("/", get(ok_handler))
            .with_observability_layer();
        let server = TestServer::new(app)?;

        let response = server.get("/").await;
        response.assert_status_ok();
        assert!(!response.header("x-request-id").is_empty());

        Ok(())
    }
}
