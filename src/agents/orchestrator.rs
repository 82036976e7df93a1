// Workflow orchestration
//
// Runs the weekly collection workflow: coordinator, communication, a wait for
// replies, aggregation, and optionally dashboard generation. Steps run strictly
// one after another; the first failure ends the run.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{AgentError, AgentResult};
use super::invoker::AgentInvoker;
use super::parser::{parse_agent_json, Parsed};
use super::prompts::{library, member_handles, member_names};
use super::sink::StateSink;
use super::state::{StepState, WorkflowState, WorkflowStatus};
use super::types::{AgentIds, AgentRole, CommunicationReceipt, CoordinatorAck};
use super::wait::ReplyWait;
use crate::domain::metrics::{
    synthesize, AggregationReport, DashboardInsights, DashboardMetrics, ReportPeriod,
};
use crate::domain::team::TeamMember;

// Progress checkpoints, in percent
const COORDINATOR_STARTED: u8 = 15;
const COORDINATOR_DONE: u8 = 35;
const COMMUNICATION_STARTED: u8 = 50;
const COMMUNICATION_DONE: u8 = 65;
const AGGREGATION_STARTED: u8 = 80;
const DASHBOARD_STARTED: u8 = 90;
const COMPLETE: u8 = 100;

/// Result of one workflow run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: WorkflowState,
    /// Present only when the run completed
    pub metrics: Option<DashboardMetrics>,
}

/// Drives one workflow run across the configured agents
pub struct WorkflowOrchestrator {
    invoker: Arc<dyn AgentInvoker>,
    reply_wait: Arc<dyn ReplyWait>,
    agents: AgentIds,
}

impl WorkflowOrchestrator {
    pub fn new(invoker: Arc<dyn AgentInvoker>, reply_wait: Arc<dyn ReplyWait>, agents: AgentIds) -> Self {
        Self {
            invoker,
            reply_wait,
            agents,
        }
    }

    /// Agents a run will invoke, in order
    pub fn steps(&self) -> Vec<AgentRole> {
        AgentRole::ALL
            .into_iter()
            .filter(|role| self.agents.for_role(*role).is_some())
            .collect()
    }

    /// Executes a full run, publishing every state change to `sink`
    ///
    /// Never returns an error: failures end the run in the `error` status with
    /// the error message recorded and progress left where it was.
    pub async fn run(
        &self,
        run_id: Uuid,
        roster: &[TeamMember],
        period: ReportPeriod,
        sink: &dyn StateSink,
    ) -> RunOutcome {
        let mut state = WorkflowState::starting(run_id, &self.steps());
        tracing::info!(%run_id, members = roster.len(), %period, "Starting workflow run");

        match self.execute(&mut state, roster, period, sink).await {
            Ok(metrics) => {
                sink.publish_metrics(&metrics).await;

                if let Err(e) = state.transition(WorkflowStatus::Complete) {
                    tracing::error!(%run_id, error = %e, "Workflow could not complete");
                }
                state.progress = COMPLETE;
                state.message = "Workflow completed successfully!".to_string();
                state.completed_at = Some(Utc::now());
                sink.publish(&state).await;

                tracing::info!(
                    %run_id,
                    total_mqls = metrics.total_mqls,
                    team_size = metrics.team_size,
                    "Workflow run completed"
                );
                RunOutcome {
                    state,
                    metrics: Some(metrics),
                }
            }
            Err(err) => {
                tracing::error!(%run_id, error = %err, "Workflow run failed");

                state.fail(err.to_string());
                sink.publish(&state).await;

                RunOutcome {
                    state,
                    metrics: None,
                }
            }
        }
    }

    async fn execute(
        &self,
        state: &mut WorkflowState,
        roster: &[TeamMember],
        period: ReportPeriod,
        sink: &dyn StateSink,
    ) -> AgentResult<DashboardMetrics> {
        let mut vars = HashMap::new();
        vars.insert("period", period.label());

        // Step 1: coordinator
        self.begin(state, AgentRole::Coordinator, COORDINATOR_STARTED, "Coordinator validating workflow...", sink)
            .await?;
        vars.insert("members", member_names(roster));
        let ack = self
            .call(AgentRole::Coordinator, &library::coordinator().render(&vars), CoordinatorAck::fallback())
            .await?;
        self.record(
            state,
            AgentRole::Coordinator,
            &ack,
            COORDINATOR_DONE,
            "Coordinator delegating to communication agent...",
            sink,
        )
        .await?;

        // Step 2: communication
        self.begin(
            state,
            AgentRole::Communication,
            COMMUNICATION_STARTED,
            "Sending Slack messages to team members...",
            sink,
        )
        .await?;
        vars.insert("members", member_handles(roster));
        let receipt = self
            .call(
                AgentRole::Communication,
                &library::communication().render(&vars),
                CommunicationReceipt::fallback(roster.len()),
            )
            .await?;
        self.record(
            state,
            AgentRole::Communication,
            &receipt,
            COMMUNICATION_DONE,
            "Messages sent, awaiting team responses...",
            sink,
        )
        .await?;

        self.reply_wait.wait_for_replies(roster).await;

        // Step 3: aggregation
        self.begin(state, AgentRole::Aggregation, AGGREGATION_STARTED, "Aggregating team responses...", sink)
            .await?;
        let report = self
            .call(
                AgentRole::Aggregation,
                &library::aggregation().render(&vars),
                AggregationReport::fallback(),
            )
            .await?;
        self.record(
            state,
            AgentRole::Aggregation,
            &report,
            AGGREGATION_STARTED,
            "Compiling dashboard metrics...",
            sink,
        )
        .await?;

        let mut metrics = {
            let mut rng = rand::rng();
            synthesize(report.value(), roster, period, &mut rng)
        };

        // Step 4: dashboard generation, when configured
        if self.agents.dashboard.is_some() {
            self.begin(state, AgentRole::Dashboard, DASHBOARD_STARTED, "Generating dashboard insights...", sink)
                .await?;
            vars.insert("metrics", serde_json::to_string(&metrics)?);
            let insights = self
                .call(
                    AgentRole::Dashboard,
                    &library::dashboard().render(&vars),
                    DashboardInsights::fallback(),
                )
                .await?;
            self.record(
                state,
                AgentRole::Dashboard,
                &insights,
                DASHBOARD_STARTED,
                "Dashboard insights ready",
                sink,
            )
            .await?;
            metrics.insights = Some(insights.into_inner());
        }

        Ok(metrics)
    }

    async fn begin(
        &self,
        state: &mut WorkflowState,
        role: AgentRole,
        progress: u8,
        message: &str,
        sink: &dyn StateSink,
    ) -> AgentResult<()> {
        let next = WorkflowStatus::running(role);
        state
            .transition(next)
            .map_err(|_| AgentError::InvalidStateTransition {
                from: state.status.to_string(),
                to: next.to_string(),
            })?;

        if let Some(step) = state.step_mut(role) {
            step.state = StepState::Running;
            step.started_at = Some(Utc::now());
        }
        state.progress = progress;
        state.message = message.to_string();

        sink.publish(state).await;
        Ok(())
    }

    async fn call<T>(&self, role: AgentRole, message: &str, fallback: T) -> AgentResult<Parsed<T>>
    where
        T: DeserializeOwned + Send,
    {
        let agent_id = self
            .agents
            .for_role(role)
            .ok_or_else(|| AgentError::ConfigError(format!("No agent configured for {} step", role)))?;

        tracing::info!(agent = %role, agent_id, "Invoking agent");
        let reply = self.invoker.invoke(message, agent_id).await?;

        let parsed = parse_agent_json(&reply.response, fallback);
        if parsed.is_defaulted() {
            tracing::warn!(agent = %role, "Agent reply could not be parsed, using fallback");
        }
        Ok(parsed)
    }

    async fn record<T: Serialize>(
        &self,
        state: &mut WorkflowState,
        role: AgentRole,
        parsed: &Parsed<T>,
        progress: u8,
        message: &str,
        sink: &dyn StateSink,
    ) -> AgentResult<()> {
        state.set_response(role, serde_json::to_value(parsed.value())?);

        if let Some(step) = state.step_mut(role) {
            step.state = StepState::Succeeded;
            step.defaulted = parsed.is_defaulted();
            step.finished_at = Some(Utc::now());
        }
        state.progress = progress;
        state.message = message.to_string();

        sink.publish(state).await;
        Ok(())
    }
}
