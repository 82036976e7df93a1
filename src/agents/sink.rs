use async_trait::async_trait;

use super::state::WorkflowState;
use crate::domain::metrics::DashboardMetrics;

/// Receives every state change of a workflow run, in order
#[async_trait]
pub trait StateSink: Send + Sync {
    async fn publish(&self, state: &WorkflowState);

    /// Called once per successful run, before the final `complete` state
    async fn publish_metrics(&self, _metrics: &DashboardMetrics) {}
}
