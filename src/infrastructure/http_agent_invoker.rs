use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use crate::agents::errors::{AgentError, AgentResult};
use crate::agents::invoker::AgentInvoker;
use crate::agents::types::AgentReply;

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    message: &'a str,
    agent_id: &'a str,
    user_id: &'a str,
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    #[serde(alias = "result")]
    response: Value,
}

/// AgentInvoker backed by an HTTP agent platform
///
/// POSTs `{message, agent_id, user_id, session_id}` as JSON to a single
/// endpoint and expects `{response: string | object}` back. Each call gets a
/// fresh session id.
pub struct HttpAgentInvoker {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    user_id: String,
}

impl HttpAgentInvoker {
    /// Creates an invoker for an endpoint
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the invoke endpoint
    /// * `api_key` - Sent as `x-api-key` when present
    /// * `timeout` - Per-request timeout
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> AgentResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AgentError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            user_id: Uuid::new_v4().simple().to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AgentInvoker for HttpAgentInvoker {
    async fn invoke(&self, message: &str, agent_id: &str) -> AgentResult<AgentReply> {
        let request = InvokeRequest {
            message,
            agent_id,
            user_id: &self.user_id,
            session_id: Uuid::new_v4().simple().to_string(),
        };

        tracing::debug!(endpoint = %self.endpoint, agent_id, "Sending agent request");

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::InvocationFailed {
                agent: agent_id.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body: InvokeResponse = response.json().await?;
        let response = match body.response {
            Value::String(text) => text,
            other => other.to_string(),
        };

        Ok(AgentReply { response })
    }
}
