//! API route definitions

use crate::api::handlers;
use crate::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create the main API router
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Configuration endpoints
        .route("/api/config", get(handlers::get_config))
        .route(
            "/api/features",
            get(handlers::get_features).post(handlers::update_feature),
        )
        .route("/api/env", get(handlers::get_env))
        // Log endpoints
        .route(
            "/api/logs",
            get(handlers::get_logs).post(handlers::create_log),
        )
        // Health and status endpoints
        .route("/api/health", get(handlers::health_check))
        .route("/api/system", get(handlers::system_info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;
    use types::LogLevel;

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn app(pairs: &[(&str, &str)]) -> Router {
        create_routes().with_state(test_support::state(pairs).0)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = send(app(&[]), get_request("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["environment"], "development");
        assert_eq!(body["version"], "1.0.0-dev");
        assert_eq!(body["checks"]["redis"], "ok");
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_config_endpoint_production() {
        let (status, body) = send(
            app(&[("NODE_ENV", "production"), ("FEATURE_FLAG_BETA_FEATURES", "true")]),
            get_request("/api/config"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["app"]["name"], "Template App");
        assert_eq!(body["app"]["url"], "https://x.com");
        assert_eq!(body["api"]["timeout"], 10000);
        assert_eq!(body["features"]["betaFeatures"], false);
        assert_eq!(
            body["featureFlags"],
            json!({ "newUI": false, "betaFeatures": false, "debugMode": false })
        );
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_features_endpoint() {
        let (status, body) = send(
            app(&[("FEATURE_FLAG_NEW_UI", "true")]),
            get_request("/api/features"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["environment"], "development");
        assert_eq!(body["features"]["hotReload"], true);
        assert_eq!(body["evaluated_flags"]["newUI"], true);
        assert_eq!(body["evaluated_flags"]["debugMode"], true);
    }

    #[tokio::test]
    async fn test_update_feature() {
        let (status, body) = send(
            app(&[]),
            post_request("/api/features", r#"{"feature":"newUI","enabled":true}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["feature"], "newUI");
        assert_eq!(body["enabled"], true);
        assert_eq!(body["message"], "Feature 'newUI' enabled (demo mode)");

        // Not persisted
        let (_, features) = send(app(&[]), get_request("/api/features")).await;
        assert_eq!(features["evaluated_flags"]["newUI"], false);
    }

    #[tokio::test]
    async fn test_update_feature_rejects_bad_body() {
        for body in [
            r#"{"feature":"newUI"}"#,
            r#"{"feature":"","enabled":true}"#,
            r#"{"feature":"newUI","enabled":"yes"}"#,
            "not json",
        ] {
            let (status, response) = send(app(&[]), post_request("/api/features", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body={body}");
            assert!(response["error"].as_str().unwrap().starts_with("Invalid request body"));
        }
    }

    #[tokio::test]
    async fn test_env_endpoint_hides_secrets() {
        let (status, body) = send(
            app(&[
                ("DATABASE_URL", "postgres://user:pw@db/app"),
                ("JWT_SECRET", "0123456789abcdef0123456789abcdef"),
            ]),
            get_request("/api/env"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["node_env"], "development");
        assert_eq!(body["count"], 5);
        assert_eq!(body["public_variables"]["NEXT_PUBLIC_APP_URL"], "https://x.com");
        assert!(body["public_variables"].get("NEXT_PUBLIC_GA_TRACKING_ID").is_none());

        let rendered = body.to_string();
        assert!(!rendered.contains("postgres://"));
        assert!(!rendered.contains("0123456789abcdef"));
    }

    #[tokio::test]
    async fn test_logs_round_trip() {
        let (state, _) = test_support::state(&[]);
        let app = create_routes().with_state(state);

        let (status, created) = send(
            app.clone(),
            post_request(
                "/api/logs",
                r#"{"level":"error","message":"disk full","metadata":{"disk":"sda"}}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["level"], "error");
        assert_eq!(created["metadata"]["disk"], "sda");
        assert!(created["id"].is_string());

        send(app.clone(), post_request("/api/logs", r#"{"level":"info","message":"ok"}"#)).await;

        let (_, all) = send(app.clone(), get_request("/api/logs")).await;
        assert_eq!(all["total"], 2);
        assert_eq!(all["limit"], 50);
        assert!(all["filtered_by"].is_null());
        assert_eq!(all["logs"][0]["message"], "ok");
        assert!(all["logs"][0].get("metadata").is_none());

        let (_, errors) = send(app.clone(), get_request("/api/logs?level=error&limit=1")).await;
        assert_eq!(errors["total"], 1);
        assert_eq!(errors["limit"], 1);
        assert_eq!(errors["filtered_by"], json!({ "level": "error" }));
        assert_eq!(errors["logs"][0]["id"], created["id"]);

        let (_, fallback) = send(app, get_request("/api/logs?limit=abc")).await;
        assert_eq!(fallback["limit"], 50);
    }

    #[tokio::test]
    async fn test_create_log_rejects_bad_body() {
        for body in [
            r#"{"level":"info"}"#,
            r#"{"message":"m"}"#,
            r#"{"level":"","message":"m"}"#,
            r#"{"level":"info","message":""}"#,
        ] {
            let (status, _) = send(app(&[]), post_request("/api/logs", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body={body}");
        }
    }

    #[tokio::test]
    async fn test_create_log_echoes_through_logger() {
        let (state, sink) = test_support::state(&[("NODE_ENV", "production")]);
        let app = create_routes().with_state(state);

        send(
            app.clone(),
            post_request("/api/logs", r#"{"level":"warn","message":"slow","metadata":{"ms":900}}"#),
        )
        .await;
        // Unknown levels are stored and echoed at info
        send(app, post_request("/api/logs", r#"{"level":"trace","message":"x"}"#)).await;

        let warn: Value = serde_json::from_str(&sink.lines(LogLevel::Warn)[0]).unwrap();
        assert_eq!(warn["message"], "slow");
        assert_eq!(warn["context"]["ms"], 900);
        assert_eq!(sink.lines(LogLevel::Info).len(), 1);
    }

    #[tokio::test]
    async fn test_system_endpoint() {
        let (status, body) = send(app(&[]), get_request("/api/system")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["platform"], std::env::consts::OS);
        assert!(body["cpus"].as_u64().unwrap() >= 1);
        assert!(!body["hostname"].as_str().unwrap().is_empty());
    }
}
