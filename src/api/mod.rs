// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod views;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::agents::WorkflowController;
use handlers::{dashboard, health, roster, workflow};

/// Builds the HTTP router over a shared workflow controller
pub fn router(controller: Arc<WorkflowController>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Roster routes
        .route("/api/roster", get(roster::list_members).post(roster::add_member))
        .route("/api/roster/:index", delete(roster::remove_member))
        // Workflow routes
        .route("/api/workflow", get(workflow::get_workflow))
        .route("/api/workflow/run", post(workflow::start_workflow))
        .route("/api/workflow/logs", get(workflow::get_logs))
        // Dashboard routes
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route("/api/dashboard/export", get(dashboard::export_json))
        .route("/api/dashboard/export/pdf", get(dashboard::export_pdf))
        .route("/api/dashboard/export/html", get(dashboard::export_html))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(controller)
}
