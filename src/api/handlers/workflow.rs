use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::agents::{AgentRole, WorkflowController, WorkflowState};
use crate::api::errors::ApiError;
use crate::domain::metrics::ReportPeriod;

/// Optional request body for starting a run
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartWorkflowRequest {
    /// Any date inside the week to report on; defaults to the current week
    pub period_start: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartWorkflowResponse {
    pub run_id: Uuid,
    pub report_period: ReportPeriod,
}

/// Raw agent output per step, pretty-printed for display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowLogs {
    pub coordinator: String,
    pub communication: String,
    pub aggregation: String,
    pub dashboard: String,
}

impl From<&WorkflowState> for WorkflowLogs {
    fn from(state: &WorkflowState) -> Self {
        Self {
            coordinator: log_entry(state, AgentRole::Coordinator),
            communication: log_entry(state, AgentRole::Communication),
            aggregation: log_entry(state, AgentRole::Aggregation),
            dashboard: log_entry(state, AgentRole::Dashboard),
        }
    }
}

fn log_entry(state: &WorkflowState, role: AgentRole) -> String {
    state
        .response(role)
        .and_then(|value| serde_json::to_string_pretty(value).ok())
        .unwrap_or_else(|| format!("No {} response yet", role))
}

/// Start a workflow run in the background
///
/// POST /api/workflow/run
pub async fn start_workflow(
    State(controller): State<Arc<WorkflowController>>,
    body: Option<Json<StartWorkflowRequest>>,
) -> Result<(StatusCode, Json<StartWorkflowResponse>), ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let report_period = req
        .period_start
        .map(ReportPeriod::week_containing)
        .unwrap_or_else(ReportPeriod::current_week);

    let run_id = controller.spawn_run(report_period)?;
    tracing::info!(%run_id, period = %report_period, "Workflow run started");

    Ok((
        StatusCode::ACCEPTED,
        Json(StartWorkflowResponse {
            run_id,
            report_period,
        }),
    ))
}

/// Current workflow state
///
/// GET /api/workflow
pub async fn get_workflow(State(controller): State<Arc<WorkflowController>>) -> Json<WorkflowState> {
    Json(controller.state().await)
}

/// Agent responses from the latest run
///
/// GET /api/workflow/logs
pub async fn get_logs(State(controller): State<Arc<WorkflowController>>) -> Json<WorkflowLogs> {
    let state = controller.state().await;
    Json(WorkflowLogs::from(&state))
}
