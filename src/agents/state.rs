// Workflow state
//
// The single record a workflow run mutates and publishes after every step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::AgentRole;

/// Lifecycle status of a workflow run
///
/// # Status Transitions
/// ```text
/// Idle -> CoordinatorRunning -> CommunicationRunning -> AggregationRunning
///      -> [DashboardRunning] -> Complete
///
/// any running status -> Error
/// Complete | Error -> CoordinatorRunning (new run)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Idle,
    CoordinatorRunning,
    CommunicationRunning,
    AggregationRunning,
    DashboardRunning,
    Complete,
    Error,
}

impl WorkflowStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Example
    /// ```
    /// use pulse_api::agents::state::WorkflowStatus;
    ///
    /// assert!(WorkflowStatus::Idle.can_transition_to(WorkflowStatus::CoordinatorRunning));
    /// assert!(!WorkflowStatus::Idle.can_transition_to(WorkflowStatus::Complete));
    /// ```
    pub fn can_transition_to(&self, next: WorkflowStatus) -> bool {
        use WorkflowStatus::*;
        if self.is_running() && next == Error {
            return true;
        }
        matches!(
            (self, next),
            (Idle, CoordinatorRunning)
                | (CoordinatorRunning, CommunicationRunning)
                | (CommunicationRunning, AggregationRunning)
                | (AggregationRunning, DashboardRunning)
                | (AggregationRunning, Complete)
                | (DashboardRunning, Complete)
                | (Complete, CoordinatorRunning)
                | (Error, CoordinatorRunning)
        )
    }

    /// True while an agent step is in flight
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            WorkflowStatus::CoordinatorRunning
                | WorkflowStatus::CommunicationRunning
                | WorkflowStatus::AggregationRunning
                | WorkflowStatus::DashboardRunning
        )
    }

    /// Status while the given agent's step runs
    pub fn running(role: AgentRole) -> Self {
        match role {
            AgentRole::Coordinator => WorkflowStatus::CoordinatorRunning,
            AgentRole::Communication => WorkflowStatus::CommunicationRunning,
            AgentRole::Aggregation => WorkflowStatus::AggregationRunning,
            AgentRole::Dashboard => WorkflowStatus::DashboardRunning,
        }
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowStatus::Idle => write!(f, "idle"),
            WorkflowStatus::CoordinatorRunning => write!(f, "coordinator_running"),
            WorkflowStatus::CommunicationRunning => write!(f, "communication_running"),
            WorkflowStatus::AggregationRunning => write!(f, "aggregation_running"),
            WorkflowStatus::DashboardRunning => write!(f, "dashboard_running"),
            WorkflowStatus::Complete => write!(f, "complete"),
            WorkflowStatus::Error => write!(f, "error"),
        }
    }
}

/// Progress of a single agent step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Record of one agent step within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub agent: AgentRole,
    pub state: StepState,
    /// True when the reply could not be parsed and the fallback was used
    pub defaulted: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl StepRecord {
    pub fn pending(agent: AgentRole) -> Self {
        Self {
            agent,
            state: StepState::Pending,
            defaulted: false,
            started_at: None,
            finished_at: None,
        }
    }
}

/// Observable state of the current (or last) workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    pub run_id: Option<Uuid>,
    pub status: WorkflowStatus,
    /// Percentage in [0, 100]
    pub progress: u8,
    pub message: String,
    pub steps: Vec<StepRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinator_response: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication_response: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_response: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_response: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkflowState {
    /// State before any run
    pub fn idle() -> Self {
        Self {
            run_id: None,
            status: WorkflowStatus::Idle,
            progress: 0,
            message: "Ready to start workflow".to_string(),
            steps: Vec::new(),
            coordinator_response: None,
            communication_response: None,
            aggregation_response: None,
            dashboard_response: None,
            error: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Fresh state for a new run over the given steps
    pub fn starting(run_id: Uuid, agents: &[AgentRole]) -> Self {
        Self {
            run_id: Some(run_id),
            steps: agents.iter().copied().map(StepRecord::pending).collect(),
            started_at: Some(Utc::now()),
            ..Self::idle()
        }
    }

    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    /// Moves to `next`, rejecting transitions the lifecycle does not allow
    pub fn transition(&mut self, next: WorkflowStatus) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!("Cannot move workflow from {} to {}", self.status, next));
        }
        self.status = next;
        Ok(())
    }

    /// Ends a running workflow in `error`, keeping progress where it was
    ///
    /// The step that was running is marked failed. Does nothing to a state
    /// that is not running.
    pub fn fail(&mut self, error: impl Into<String>) {
        if !self.status.can_transition_to(WorkflowStatus::Error) {
            return;
        }
        if let Some(step) = self.steps.iter_mut().find(|s| s.state == StepState::Running) {
            step.state = StepState::Failed;
            step.finished_at = Some(Utc::now());
        }
        self.status = WorkflowStatus::Error;
        self.message = "Workflow failed".to_string();
        self.error = Some(error.into());
    }

    pub fn step(&self, agent: AgentRole) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.agent == agent)
    }

    pub fn step_mut(&mut self, agent: AgentRole) -> Option<&mut StepRecord> {
        self.steps.iter_mut().find(|s| s.agent == agent)
    }

    /// Parsed response recorded for an agent, if any
    pub fn response(&self, agent: AgentRole) -> Option<&serde_json::Value> {
        match agent {
            AgentRole::Coordinator => self.coordinator_response.as_ref(),
            AgentRole::Communication => self.communication_response.as_ref(),
            AgentRole::Aggregation => self.aggregation_response.as_ref(),
            AgentRole::Dashboard => self.dashboard_response.as_ref(),
        }
    }

    pub fn set_response(&mut self, agent: AgentRole, value: serde_json::Value) {
        let slot = match agent {
            AgentRole::Coordinator => &mut self.coordinator_response,
            AgentRole::Communication => &mut self.communication_response,
            AgentRole::Aggregation => &mut self.aggregation_response,
            AgentRole::Dashboard => &mut self.dashboard_response,
        };
        *slot = Some(value);
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::idle()
    }
}
