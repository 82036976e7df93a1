use thiserror::Error;

/// Errors that can occur in the agent workflow
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Agent {agent} returned {status}: {body}")]
    InvocationFailed {
        agent: String,
        status: u16,
        body: String,
    },

    #[error("Agent transport error: {0}")]
    Transport(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Roster unavailable: {0}")]
    RosterUnavailable(String),

    #[error("A workflow run is already in progress")]
    AlreadyRunning,

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::Transport(err.to_string())
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
