//! REST API server for the intent router
//!
//! One inbound endpoint: POST /route accepting `{ "message": string }` and
//! returning the response envelope as JSON. Per-request conditions always
//! come back as HTTP 200 with a status field in the body; only transport
//! level failures surface as non-200.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::models::ResponseEnvelope;
use crate::router::RouterService;

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub message: String,
}

#[derive(Clone)]
pub struct ApiState {
    pub router: Arc<RouterService>,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn route_message(
    State(state): State<ApiState>,
    Json(req): Json<RouteRequest>,
) -> Json<ResponseEnvelope> {
    if req.message.trim().is_empty() {
        return Json(ResponseEnvelope::error(None, "Message vide"));
    }

    Json(state.router.route(&req.message).await)
}

pub fn create_router(router: Arc<RouterService>) -> Router {
    let state = ApiState { router };

    Router::new()
        .route("/health", axum::routing::get(health))
        .route("/route", post(route_message))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

pub async fn start_server(
    router: Arc<RouterService>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let app = create_router(router);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("Router API listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
