use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use tokviz_core::Visualizer;
use tokviz_types::{VisualizeRequest, VisualizeResponse};

use crate::config::{API_VERSION, SERVICE_NAME};

#[derive(Clone)]
pub struct AppState {
    pub visualizer: Arc<Visualizer>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

pub fn router(state: AppState, cors_origins: Vec<HeaderValue>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(cors_origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    Router::new()
        .route("/health", get(health))
        .route("/api/visualize", post(visualize))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        service: SERVICE_NAME,
        version: API_VERSION,
    })
}

async fn visualize(
    State(state): State<AppState>,
    Json(req): Json<VisualizeRequest>,
) -> Result<Json<VisualizeResponse>, (StatusCode, String)> {
    let request_id = Uuid::new_v4();
    let resp = state.visualizer.visualize(&req.input_text).map_err(|e| {
        warn!(%request_id, error = %e, "visualize failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    info!(%request_id, tokens = resp.tokens.len(), "visualize ok");
    Ok(Json(resp))
}
