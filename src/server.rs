/// HTTP server setup and routing
use crate::{
    context::AppContext,
    error::{ErrorResponse, PetError, PetResult},
    metrics,
    rate_limit::rate_limit_middleware,
};
use axum::{
    extract::{DefaultBodyLimit, MatchedPath, Request},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{Json, Response},
    Router,
};
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Room for the text fields and multipart framing around the image
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the main application router
/// Returns Router<()> because state is already provided
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE]);

    let body_limit = ctx.config.intake.max_image_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .merge(crate::api::routes())
        .fallback(not_found)
        // Provide state - converts Router<AppContext> to Router<()>
        .with_state(ctx.clone())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(ctx, rate_limit_middleware))
        .layer(middleware::from_fn(track_metrics))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Endpoint not found".to_string(),
        }),
    )
}

/// Count and time every request, labelled by route template
async fn track_metrics(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    metrics::record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );

    response
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> PetResult<()> {
    let addr = ctx.bind_address();

    info!("Lostpaw v{} listening on {}", ctx.config.service.version, addr);
    info!("   Public URL: {}", ctx.config.service.public_url);
    info!("   Object store: {}", ctx.objects.backend_name());

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PetError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| PetError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
