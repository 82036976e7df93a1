// Workflow controller
//
// Owns all mutable state the presentation layer reads: the roster (through
// its repository), the latest workflow state, and the latest dashboard.
// At most one run is in flight at a time.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::errors::{AgentError, AgentResult};
use super::orchestrator::WorkflowOrchestrator;
use super::sink::StateSink;
use super::state::WorkflowState;
use crate::domain::metrics::{DashboardMetrics, ReportPeriod};
use crate::domain::repositories::RosterRepository;

/// Releases the run lock when dropped
struct RunGuard {
    running: Arc<AtomicBool>,
}

impl RunGuard {
    fn acquire(running: &Arc<AtomicBool>) -> AgentResult<Self> {
        running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| AgentError::AlreadyRunning)?;
        Ok(Self {
            running: Arc::clone(running),
        })
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

pub struct WorkflowController {
    roster: Arc<dyn RosterRepository>,
    orchestrator: WorkflowOrchestrator,
    state: RwLock<WorkflowState>,
    dashboard: RwLock<Option<DashboardMetrics>>,
    running: Arc<AtomicBool>,
}

impl WorkflowController {
    pub fn new(roster: Arc<dyn RosterRepository>, orchestrator: WorkflowOrchestrator) -> Self {
        Self {
            roster,
            orchestrator,
            state: RwLock::new(WorkflowState::idle()),
            dashboard: RwLock::new(None),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn roster(&self) -> &Arc<dyn RosterRepository> {
        &self.roster
    }

    /// Latest published workflow state
    pub async fn state(&self) -> WorkflowState {
        self.state.read().await.clone()
    }

    /// Dashboard from the last successful run
    pub async fn dashboard(&self) -> Option<DashboardMetrics> {
        self.dashboard.read().await.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs the workflow to completion on the current task
    ///
    /// # Returns
    /// * `Ok(WorkflowState)` - Final state, which may be `error`
    /// * `Err(AgentError::AlreadyRunning)` - If another run holds the lock
    pub async fn run(&self, period: ReportPeriod) -> AgentResult<WorkflowState> {
        let _guard = RunGuard::acquire(&self.running)?;
        self.run_unguarded(Uuid::new_v4(), period).await
    }

    /// Starts a run in the background and returns its id
    ///
    /// The run executes on its own task. If that task panics, the published
    /// state is moved to `error` before the run lock is released.
    pub fn spawn_run(self: &Arc<Self>, period: ReportPeriod) -> AgentResult<Uuid> {
        let guard = RunGuard::acquire(&self.running)?;
        let run_id = Uuid::new_v4();
        let controller = Arc::clone(self);

        tokio::spawn(async move {
            let worker = Arc::clone(&controller);
            let joined = tokio::spawn(async move { worker.run_unguarded(run_id, period).await }).await;

            match joined {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    tracing::error!(%run_id, error = %e, "Workflow run could not start");
                }
                Err(e) => {
                    tracing::error!(%run_id, error = %e, "Workflow run aborted");
                    let mut state = controller.state.write().await;
                    if state.run_id == Some(run_id) {
                        state.fail(format!("Workflow run aborted: {}", e));
                    }
                }
            }
            drop(guard);
        });

        Ok(run_id)
    }

    /// Runs with the lock already held by the caller
    async fn run_unguarded(&self, run_id: Uuid, period: ReportPeriod) -> AgentResult<WorkflowState> {
        // The roster is snapshotted here; edits made during the run apply to
        // the next one.
        let members = self
            .roster
            .list()
            .await
            .map_err(AgentError::RosterUnavailable)?;

        let outcome = self.orchestrator.run(run_id, &members, period, self).await;
        Ok(outcome.state)
    }
}

#[async_trait]
impl StateSink for WorkflowController {
    async fn publish(&self, state: &WorkflowState) {
        *self.state.write().await = state.clone();
    }

    async fn publish_metrics(&self, metrics: &DashboardMetrics) {
        *self.dashboard.write().await = Some(metrics.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::invoker::AgentInvoker;
    use crate::agents::state::WorkflowStatus;
    use crate::agents::types::{AgentIds, AgentReply};
    use crate::agents::wait::FixedDelay;
    use crate::domain::team::Roster;
    use crate::infrastructure::repositories::InMemoryRosterRepository;
    use std::time::Duration;

    struct EchoInvoker;

    #[async_trait]
    impl AgentInvoker for EchoInvoker {
        async fn invoke(&self, _message: &str, _agent_id: &str) -> AgentResult<AgentReply> {
            Ok(AgentReply {
                response: "{}".to_string(),
            })
        }
    }

    /// Succeeds for the first `ok_calls` invocations, then fails
    struct FlakyInvoker {
        ok_calls: usize,
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl AgentInvoker for FlakyInvoker {
        async fn invoke(&self, _message: &str, agent_id: &str) -> AgentResult<AgentReply> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.ok_calls {
                return Ok(AgentReply {
                    response: "{}".to_string(),
                });
            }
            Err(AgentError::InvocationFailed {
                agent: agent_id.to_string(),
                status: 500,
                body: "boom".to_string(),
            })
        }
    }

    /// Answers the aggregation agent with a fixed reply and everyone else with `{}`
    struct AggregationInvoker {
        aggregation: String,
    }

    #[async_trait]
    impl AgentInvoker for AggregationInvoker {
        async fn invoke(&self, _message: &str, agent_id: &str) -> AgentResult<AgentReply> {
            let response = if agent_id == AgentIds::default().aggregation {
                self.aggregation.clone()
            } else {
                "{}".to_string()
            };
            Ok(AgentReply { response })
        }
    }

    /// Panics once the communication step is reached
    struct PanickingInvoker;

    #[async_trait]
    impl AgentInvoker for PanickingInvoker {
        async fn invoke(&self, _message: &str, agent_id: &str) -> AgentResult<AgentReply> {
            if agent_id == AgentIds::default().communication {
                panic!("agent client crashed");
            }
            Ok(AgentReply {
                response: "{}".to_string(),
            })
        }
    }

    async fn wait_until_idle(controller: &WorkflowController) {
        for _ in 0..100 {
            if !controller.is_running() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("Workflow run did not finish");
    }

    fn controller(invoker: Arc<dyn AgentInvoker>, delay: Duration) -> Arc<WorkflowController> {
        let roster = Arc::new(InMemoryRosterRepository::new(Roster::default()));
        let orchestrator =
            WorkflowOrchestrator::new(invoker, Arc::new(FixedDelay::new(delay)), AgentIds::default());
        Arc::new(WorkflowController::new(roster, orchestrator))
    }

    #[tokio::test]
    async fn starts_idle_without_dashboard() {
        let controller = controller(Arc::new(EchoInvoker), Duration::ZERO);

        assert_eq!(controller.state().await.status, WorkflowStatus::Idle);
        assert!(controller.dashboard().await.is_none());
        assert!(!controller.is_running());
    }

    #[tokio::test]
    async fn run_stores_state_and_dashboard() {
        let controller = controller(Arc::new(EchoInvoker), Duration::ZERO);

        let state = controller.run(ReportPeriod::current_week()).await.unwrap();

        assert_eq!(state.status, WorkflowStatus::Complete);
        assert_eq!(controller.state().await, state);
        assert_eq!(controller.dashboard().await.unwrap().team_size, 3);
        assert!(!controller.is_running());
    }

    #[tokio::test]
    async fn roster_edits_apply_to_next_run() {
        let controller = controller(Arc::new(EchoInvoker), Duration::ZERO);

        controller.roster().remove_member(0).await.unwrap();
        assert!(controller.dashboard().await.is_none());

        controller.run(ReportPeriod::current_week()).await.unwrap();
        assert_eq!(controller.dashboard().await.unwrap().team_size, 2);
    }

    #[tokio::test]
    async fn failed_run_keeps_previous_dashboard() {
        let invoker = Arc::new(FlakyInvoker {
            ok_calls: 3,
            calls: Default::default(),
        });
        let controller = controller(invoker, Duration::ZERO);

        controller.run(ReportPeriod::current_week()).await.unwrap();
        let before = controller.dashboard().await;
        assert!(before.is_some());

        let state = controller.run(ReportPeriod::current_week()).await.unwrap();

        assert_eq!(state.status, WorkflowStatus::Error);
        assert_eq!(state.progress, 15);
        assert_eq!(
            state.error.as_deref(),
            Some("Agent 68fd3f07058210757bf6403f returned 500: boom")
        );
        assert_eq!(controller.dashboard().await, before);
        assert!(!controller.is_running());
    }

    #[tokio::test]
    async fn huge_reported_counts_complete_in_background() {
        let invoker = Arc::new(AggregationInvoker {
            aggregation: r#"{"members": [
                {"name": "Alice Johnson", "mqls": 3000000000, "campaigns": 3000000000},
                {"name": "Bob Smith", "mqls": 3000000000, "campaigns": 3000000000}
            ]}"#
            .to_string(),
        });
        let controller = controller(invoker, Duration::ZERO);

        controller.spawn_run(ReportPeriod::current_week()).unwrap();
        wait_until_idle(&controller).await;

        let state = controller.state().await;
        assert_eq!(state.status, WorkflowStatus::Complete);
        assert_eq!(state.progress, 100);

        let metrics = controller.dashboard().await.unwrap();
        assert_eq!(metrics.total_mqls, 2_000_000);
        assert_eq!(metrics.total_campaigns, 2_000_000);
        assert_eq!(
            metrics.total_mqls,
            metrics.members.iter().map(|m| m.mqls).sum::<u32>()
        );
    }

    #[tokio::test]
    async fn panicking_run_ends_in_error_and_releases_lock() {
        let controller = controller(Arc::new(PanickingInvoker), Duration::ZERO);

        controller.spawn_run(ReportPeriod::current_week()).unwrap();
        wait_until_idle(&controller).await;

        let state = controller.state().await;
        assert_eq!(state.status, WorkflowStatus::Error);
        assert_eq!(state.progress, 50);
        assert!(state
            .error
            .as_deref()
            .unwrap()
            .starts_with("Workflow run aborted"));
        assert!(controller.dashboard().await.is_none());

        assert!(controller.spawn_run(ReportPeriod::current_week()).is_ok());
        wait_until_idle(&controller).await;
    }

    #[tokio::test]
    async fn second_run_is_rejected_while_running() {
        let controller = controller(Arc::new(EchoInvoker), Duration::from_millis(300));

        controller.spawn_run(ReportPeriod::current_week()).unwrap();
        assert!(controller.is_running());

        let second = controller.spawn_run(ReportPeriod::current_week());
        assert!(matches!(second, Err(AgentError::AlreadyRunning)));
        assert!(matches!(
            controller.run(ReportPeriod::current_week()).await,
            Err(AgentError::AlreadyRunning)
        ));

        for _ in 0..100 {
            if !controller.is_running() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(!controller.is_running());
        assert_eq!(controller.state().await.status, WorkflowStatus::Complete);
    }
}
