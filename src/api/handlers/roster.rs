use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::agents::WorkflowController;
use crate::api::errors::ApiError;
use crate::domain::team::events::RosterEvent;
use crate::domain::team::TeamMember;

/// Request body for adding a roster member
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub name: String,
}

/// Response from adding a member: the member plus the roster event it caused
#[derive(Debug, Serialize)]
pub struct AddMemberResponse {
    #[serde(flatten)]
    pub member: TeamMember,
    pub event: RosterEvent,
}

/// List roster members in order
///
/// GET /api/roster
pub async fn list_members(
    State(controller): State<Arc<WorkflowController>>,
) -> Result<Json<Vec<TeamMember>>, ApiError> {
    let members = controller
        .roster()
        .list()
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Failed to read roster: {}", e)))?;

    Ok(Json(members))
}

/// Add a member by display name
///
/// POST /api/roster
pub async fn add_member(
    State(controller): State<Arc<WorkflowController>>,
    Json(req): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<AddMemberResponse>), ApiError> {
    let (member, event) = controller
        .roster()
        .add_member(&req.name)
        .await
        .map_err(ApiError::bad_request)?;

    tracing::info!(event = ?event, "Roster updated");
    Ok((StatusCode::CREATED, Json(AddMemberResponse { member, event })))
}

/// Remove the member at a position
///
/// DELETE /api/roster/:index
pub async fn remove_member(
    State(controller): State<Arc<WorkflowController>>,
    Path(index): Path<usize>,
) -> Result<StatusCode, ApiError> {
    let event = controller.roster().remove_member(index).await.map_err(|e| {
        if e.contains("not found") {
            ApiError::not_found(e)
        } else {
            ApiError::internal_server_error(e)
        }
    })?;

    tracing::info!(event = ?event, "Roster updated");
    Ok(StatusCode::NO_CONTENT)
}
