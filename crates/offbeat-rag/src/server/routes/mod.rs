//! API routes for the query server

pub mod query;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/query", post(query::query_travel))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    let options = state.pipeline().options();

    axum::Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Travel advice for offbeat Indian destinations, grounded on retrieved summaries",
        "index": options.index,
        "model": options.model,
        "top_k": options.top_k,
        "endpoints": {
            "POST /api/query": "Ask a travel question",
            "GET /api/info": "Service information",
            "GET /health": "Liveness check",
            "GET /ready": "Readiness check"
        }
    }))
}
