//! HTTP middleware implementations

use crate::app::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use logger::context;
use serde_json::json;
use std::{sync::Arc, time::Instant};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Log each request through a child logger bound to its id, method and path
pub async fn request_logging(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let request_id = Uuid::new_v4();
    let started = Instant::now();
    let log = state.logger.child(context(json!({
        "request_id": request_id.to_string(),
        "method": request.method().as_str(),
        "path": request.uri().path(),
    })));

    log.debug("Request received", None);

    let mut response = next.run(request).await;
    let status = response.status();
    let fields = Some(context(json!({
        "status": status.as_u16(),
        "duration_ms": started.elapsed().as_millis() as u64,
    })));

    if status.is_server_error() {
        log.error("Request failed", None, fields);
    } else if status.is_client_error() {
        log.warn("Request rejected", fields);
    } else {
        log.info("Request completed", fields);
    }

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
