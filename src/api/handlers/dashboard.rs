use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::agents::WorkflowController;
use crate::api::errors::ApiError;
use crate::api::views::DashboardView;
use crate::domain::metrics::DashboardMetrics;

async fn latest(controller: &WorkflowController) -> Result<DashboardMetrics, ApiError> {
    controller
        .dashboard()
        .await
        .ok_or_else(|| ApiError::not_found("Run the workflow to generate dashboard data"))
}

/// Dashboard view of the latest successful run
///
/// GET /api/dashboard
pub async fn get_dashboard(
    State(controller): State<Arc<WorkflowController>>,
) -> Result<Json<DashboardView>, ApiError> {
    let metrics = latest(&controller).await?;
    Ok(Json(DashboardView::build(&metrics, controller.is_running())))
}

/// Download the raw dashboard metrics
///
/// GET /api/dashboard/export
pub async fn export_json(
    State(controller): State<Arc<WorkflowController>>,
) -> Result<Response, ApiError> {
    let metrics = latest(&controller).await?;
    let filename = format!(
        "marketing-dashboard-{}.json",
        metrics.generated_at.date_naive()
    );

    let disposition = format!("attachment; filename=\"{}\"", filename);
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(metrics)).into_response())
}

/// GET /api/dashboard/export/pdf
pub async fn export_pdf() -> ApiError {
    ApiError::not_implemented("PDF export is not available")
}

/// GET /api/dashboard/export/html
pub async fn export_html() -> ApiError {
    ApiError::not_implemented("HTML export is not available")
}
