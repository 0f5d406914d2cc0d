//! HTTP surface of the service.
//!
//! Endpoints:
//!   GET    /tasks
//!   POST   /tasks
//!   PUT    /tasks/{id}/done
//!   PUT    /tasks/{id}
//!   DELETE /tasks/{id}
//!   GET    /health
//!   GET    /            (embedded web client, plus /app.js and /styles.css)

pub mod assets;
pub mod routes;

use anyhow::{Context as _, Result};
use axum::{
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::storage::TaskStore;

pub async fn serve(store: TaskStore, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let router = build_router(store);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("TaskFlow API listening on http://{}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(store: TaskStore) -> Router {
    Router::new()
        // Web client
        .route("/", get(assets::index))
        .route("/app.js", get(assets::app_js))
        .route("/styles.css", get(assets::styles_css))
        // Health (no task semantics)
        .route("/health", get(routes::health::health))
        // Tasks
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/tasks/{id}/done", put(routes::tasks::update_status))
        .route(
            "/tasks/{id}",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .fallback(not_found)
        // Browser page may be served from another origin during development.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Resource not found." })),
    )
}
