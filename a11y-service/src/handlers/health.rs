use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Accessibility Analyzer Backend API is running!",
        "timestamp": now(),
        "status": "success"
    }))
}

/// Liveness probe.
///
/// GET /api/v1/health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "accessibility-analyzer",
        "timestamp": now()
    }))
}
