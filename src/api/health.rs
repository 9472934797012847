/// Health check endpoints for liveness and readiness probes
///
/// Supports two types of probes:
/// - Liveness: Is the process alive? (restart if not)
/// - Readiness: Can it accept submissions? (remove from load balancer if not)
///
/// Readiness requires both the report database and the object store.
use crate::{
    context::AppContext,
    error::{PetError, PetResult},
    metrics,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use std::time::Instant;

/// Path probed on the object store; it never needs to exist
const PROBE_PATH: &str = "health/probe";

/// Health of an individual component
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    /// "healthy" or "unhealthy"
    pub status: String,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ComponentHealth {
    fn from_result(name: &str, started: Instant, result: PetResult<serde_json::Value>) -> Self {
        let response_time_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(details) => Self {
                name: name.to_string(),
                status: "healthy".to_string(),
                response_time_ms,
                error: None,
                details: Some(details),
            },
            Err(e) => Self {
                name: name.to_string(),
                status: "unhealthy".to_string(),
                response_time_ms,
                error: Some(e.to_string()),
                details: None,
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Build health and metrics routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health_basic))
        .route("/health/live", get(liveness_probe))
        .route("/health/ready", get(readiness_probe))
        .route("/metrics", get(metrics_handler))
}

/// Basic health check
pub async fn health_basic() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Liveness probe: responding at all is enough
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe with per-component detail. 503 when any check fails.
pub async fn readiness_probe(
    State(ctx): State<AppContext>,
) -> (StatusCode, Json<serde_json::Value>) {
    let checks = vec![check_database(&ctx).await, check_object_store(&ctx).await];
    let ready = checks.iter().all(ComponentHealth::is_healthy);

    if !ready {
        tracing::warn!(?checks, "readiness probe failed");
    }

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "unavailable" },
            "version": env!("CARGO_PKG_VERSION"),
            "checks": checks,
        })),
    )
}

/// Prometheus scrape endpoint
async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render_metrics(),
    )
}

async fn check_database(ctx: &AppContext) -> ComponentHealth {
    let started = Instant::now();
    let result = async {
        sqlx::query("SELECT 1").execute(&ctx.db).await?;
        let pending_uploads = ctx.uploads.pending().await?;
        Ok::<_, PetError>(serde_json::json!({
            "type": "sqlite",
            "pool_size": ctx.db.size(),
            "pending_uploads": pending_uploads,
        }))
    }
    .await;

    ComponentHealth::from_result("database", started, result)
}

async fn check_object_store(ctx: &AppContext) -> ComponentHealth {
    let started = Instant::now();
    let result = ctx
        .objects
        .exists(PROBE_PATH)
        .await
        .map(|_| serde_json::json!({ "backend": ctx.objects.backend_name() }));

    ComponentHealth::from_result("object_store", started, result)
}
