//! HTTP API request handlers

use crate::app::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Json,
};
use config::profiles::features;
use logger::context;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use types::{utils::now_iso8601, LogLevel, TemplateError};

type ApiResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

const DEFAULT_LOG_LIMIT: usize = 50;

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn error_response(err: TemplateError) -> (StatusCode, Json<Value>) {
    let status = match err {
        TemplateError::Config(_) => StatusCode::BAD_REQUEST,
        TemplateError::Server(_) | TemplateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

/// The three flags every status endpoint reports
fn evaluated_flags(state: &AppState) -> Value {
    let resolver = state.environment.resolver();
    json!({
        "newUI": resolver.is_feature_enabled(features::NEW_UI),
        "betaFeatures": resolver.is_feature_enabled(features::BETA_FEATURES),
        "debugMode": resolver.is_feature_enabled(features::DEBUG_MODE),
    })
}

/// Active configuration profile
pub async fn get_config(State(state): State<Arc<AppState>>) -> ApiResult {
    let profile = state.environment.resolver().active_config();
    Ok((
        StatusCode::OK,
        Json(json!({
            "app": profile.app,
            "api": profile.api,
            "features": profile.features,
            "analytics": profile.analytics,
            "featureFlags": evaluated_flags(&state),
            "timestamp": now_iso8601(),
        })),
    ))
}

pub async fn get_features(State(state): State<Arc<AppState>>) -> ApiResult {
    let profile = state.environment.resolver().active_config();
    Ok((
        StatusCode::OK,
        Json(json!({
            "features": profile.features,
            "evaluated_flags": evaluated_flags(&state),
            "environment": profile.app.environment,
            "timestamp": now_iso8601(),
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateFeatureRequest {
    feature: Option<String>,
    enabled: Option<bool>,
}

/// Echo a flag change back without persisting it
pub async fn update_feature(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpdateFeatureRequest>, JsonRejection>,
) -> ApiResult {
    const INVALID: &str = "Invalid request body. Expected { feature: string, enabled: boolean }";

    let Json(request) = payload.map_err(|_| bad_request(INVALID))?;
    let (feature, enabled) = match (request.feature, request.enabled) {
        (Some(feature), Some(enabled)) if !feature.is_empty() => (feature, enabled),
        _ => return Err(bad_request(INVALID)),
    };

    state.logger.info(
        "Feature flag update requested",
        Some(context(json!({ "feature": feature, "enabled": enabled }))),
    );

    let verb = if enabled { "enabled" } else { "disabled" };
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": format!("Feature '{feature}' {verb} (demo mode)"),
            "feature": feature,
            "enabled": enabled,
            "updated_at": now_iso8601(),
        })),
    ))
}

/// Client-safe variables only
pub async fn get_env(State(state): State<Arc<AppState>>) -> ApiResult {
    let classification = state.environment.classification();
    let public_variables = classification.client.public_variables();
    Ok((
        StatusCode::OK,
        Json(json!({
            "count": public_variables.len(),
            "public_variables": public_variables,
            "node_env": classification.kind,
            "timestamp": now_iso8601(),
        })),
    ))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult {
    let app = &state.environment.resolver().active_config().app;
    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": now_iso8601(),
            "environment": app.environment,
            "version": app.version,
            "uptime": state.uptime_seconds(),
            "checks": {
                "database": "ok",
                "redis": "ok",
                "external_apis": "ok",
            },
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    level: Option<String>,
    limit: Option<String>,
}

/// Stored log entries, newest first
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> ApiResult {
    let limit = query
        .limit
        .as_deref()
        .and_then(|l| l.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_LOG_LIMIT);
    let level = query.level.filter(|l| !l.is_empty());

    let (logs, total) = state.log_store.query(level.as_deref(), limit).await;

    Ok((
        StatusCode::OK,
        Json(json!({
            "logs": logs,
            "total": total,
            "filtered_by": level.map(|level| json!({ "level": level })),
            "limit": limit,
            "timestamp": now_iso8601(),
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateLogRequest {
    level: Option<String>,
    message: Option<String>,
    metadata: Option<Value>,
}

/// Store a client-submitted entry and echo it through the application logger
pub async fn create_log(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateLogRequest>, JsonRejection>,
) -> ApiResult {
    const INVALID: &str =
        "Invalid request body. Expected { level: string, message: string, metadata?: any }";

    let Json(request) = payload.map_err(|_| bad_request(INVALID))?;
    let (level, message) = match (request.level, request.message) {
        (Some(level), Some(message)) if !level.is_empty() && !message.is_empty() => {
            (level, message)
        }
        _ => return Err(bad_request(INVALID)),
    };
    let metadata = request.metadata.filter(|m| !m.is_null());

    let entry = state.log_store.push(&level, &message, metadata.clone()).await;

    // Unrecognized levels are still stored verbatim
    let echo_level = level.parse::<LogLevel>().unwrap_or_default();
    state
        .logger
        .log(echo_level, &message, metadata.map(context), None);

    let body = serde_json::to_value(&entry)
        .map_err(|e| TemplateError::Internal(format!("Failed to create log entry: {e}")))
        .map_err(error_response)?;
    Ok((StatusCode::OK, Json(body)))
}

/// Host platform summary
pub async fn system_info(State(state): State<Arc<AppState>>) -> ApiResult {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    Ok((
        StatusCode::OK,
        Json(json!({
            "platform": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "hostname": hostname(),
            "cpus": cpus,
            "uptime": state.uptime_seconds(),
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": now_iso8601(),
        })),
    ))
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
