use async_trait::async_trait;

use super::errors::AgentResult;
use super::types::AgentReply;

/// Sends a natural-language instruction to a remote agent
///
/// Implementations may fail for any reason (transport, HTTP status,
/// malformed envelope); the orchestrator surfaces the error verbatim.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, message: &str, agent_id: &str) -> AgentResult<AgentReply>;
}
