//! API endpoints.

pub mod task;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, patch},
};
use serde_json::{Value, json};
use task_store::TaskStore;

use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: TaskStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Task endpoints
        .route("/api/tasks", get(task::list_tasks).post(task::create_task))
        .route(
            "/api/tasks/:id",
            get(task::get_task)
                .put(task::update_task)
                .delete(task::delete_task),
        )
        .route("/api/tasks/:id/status", patch(task::update_task_status))
        // Liveness
        .route("/", get(index))
        .route("/health", get(health_check))
}

/// Root endpoint.
async fn index() -> Json<Value> {
    Json(json!({ "message": "Task API running" }))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
