// Agent workflow modules
//
// This module contains the weekly metrics-collection workflow: the agent
// invocation seam, reply parsing, prompts, run state, and orchestration.

pub mod controller;
pub mod errors;
pub mod invoker;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod sink;
pub mod state;
pub mod types;
pub mod wait;

// Re-export main types
pub use controller::WorkflowController;
pub use errors::{AgentError, AgentResult};
pub use invoker::AgentInvoker;
pub use orchestrator::{RunOutcome, WorkflowOrchestrator};
pub use parser::{parse_agent_json, Parsed};
pub use state::{WorkflowState, WorkflowStatus};
pub use types::{AgentIds, AgentReply, AgentRole};
