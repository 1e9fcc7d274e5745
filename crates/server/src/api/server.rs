//! HTTP API server implementation

use crate::api::{middleware::request_logging, routes};
use crate::app::AppState;
use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    Router,
};
use config::{CorsConfig, CorsOrigin, ServerConfig};
use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use types::TemplateError;

/// HTTP API server
pub struct ApiServer {
    app: Router,
    addr: SocketAddr,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(state: Arc<AppState>, config: &ServerConfig) -> Result<Self> {
        let addr = config.socket_addr()?;
        let app = Self::router(state, config)?;

        info!("API server configured for {}", addr);

        Ok(Self { app, addr })
    }

    /// Routes with tracing, timeout, CORS and request logging applied
    pub fn router(state: Arc<AppState>, config: &ServerConfig) -> types::Result<Router> {
        let cors = cors_layer(&state.environment.resolver().cors_config())?;

        Ok(Router::new()
            .merge(routes::create_routes())
            .layer(from_fn_with_state(state.clone(), request_logging))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_seconds,
            )))
            .layer(cors)
            .with_state(state))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.addr();
        let listener = TcpListener::bind(addr)
            .await
            .context("Failed to bind to server address")?;

        info!("API server listening on {}", addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("API server error")?;

        info!("API server stopped");
        Ok(())
    }
}

/// Allow-all mirrors the request origin, since a literal `*` cannot be
/// combined with credentials
fn cors_layer(cors: &CorsConfig) -> types::Result<CorsLayer> {
    let origin = match &cors.origin {
        CorsOrigin::AllowAll => AllowOrigin::mirror_request(),
        CorsOrigin::List(origins) => {
            let origins = origins
                .iter()
                .map(|o| HeaderValue::from_str(o))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| TemplateError::Server(format!("Invalid CORS_ORIGIN value: {e}")))?;
            AllowOrigin::list(origins)
        }
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(cors.credentials))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::REQUEST_ID_HEADER;
    use crate::app::test_support;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;
    use types::LogLevel;

    fn health_from(origin: &str) -> Request<Body> {
        Request::builder()
            .uri("/api/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_allow_all_mirrors_origin() {
        let (state, _) = test_support::state(&[]);
        let app = ApiServer::router(state, &ServerConfig::default()).unwrap();

        let response = app.oneshot(health_from("https://client.example")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://client.example"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
        assert!(headers.contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_cors_origin_list() {
        let (state, _) = test_support::state(&[("CORS_ORIGIN", "https://a.com, https://b.com")]);
        let app = ApiServer::router(state, &ServerConfig::default()).unwrap();

        let allowed = app.clone().oneshot(health_from("https://b.com")).await.unwrap();
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://b.com"
        );

        let denied = app.oneshot(health_from("https://evil.com")).await.unwrap();
        assert!(denied.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_requests_are_logged_with_bound_context() {
        let (state, sink) = test_support::state(&[("NODE_ENV", "production")]);
        let app = ApiServer::router(state, &ServerConfig::default()).unwrap();

        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let request_id = response.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();

        let line: serde_json::Value =
            serde_json::from_str(&sink.lines(LogLevel::Info)[0]).unwrap();
        assert_eq!(line["message"], "Request completed");
        assert_eq!(line["context"]["path"], "/api/health");
        assert_eq!(line["context"]["method"], "GET");
        assert_eq!(line["context"]["status"], 200);
        assert_eq!(line["context"]["request_id"], request_id);
        // Debug is below the default threshold
        assert!(sink.lines(LogLevel::Debug).is_empty());
    }

    #[test]
    fn test_unusable_cors_origin_is_a_server_error() {
        let (state, _) = test_support::state(&[("CORS_ORIGIN", "https://a.com,bad\u{7f}origin")]);

        let Err(err) = ApiServer::router(state.clone(), &ServerConfig::default()) else {
            panic!("router accepted an origin that is not a header value");
        };
        assert!(matches!(err, TemplateError::Server(_)));
        assert!(err.to_string().starts_with("Server error: Invalid CORS_ORIGIN value"));
        assert!(ApiServer::new(state, &ServerConfig::default()).is_err());
    }

    #[test]
    fn test_new_uses_server_address() {
        let (state, _) = test_support::state(&[]);
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8081,
            request_timeout_seconds: 5,
        };
        let server = ApiServer::new(state, &config).unwrap();
        assert_eq!(server.addr().to_string(), "127.0.0.1:8081");
    }
}
