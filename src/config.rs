// Service configuration
// Read from the environment (after loading .env); every value has a default

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::agents::errors::{AgentError, AgentResult};
use crate::agents::types::AgentIds;
use crate::domain::team::roster::DEFAULT_EMAIL_DOMAIN;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_AGENT_API_URL: &str = "http://localhost:8080/api/agent/invoke";
const DEFAULT_REPLY_WAIT_MS: u64 = 2000;
const DEFAULT_AGENT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub agent_api_url: String,
    pub agent_api_key: Option<String>,
    pub agents: AgentIds,
    pub reply_wait: Duration,
    pub agent_timeout: Duration,
    pub member_email_domain: String,
}

impl Config {
    /// Loads configuration from process environment variables
    pub fn from_env() -> AgentResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AgentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let defaults = AgentIds::default();
        let agents = AgentIds {
            coordinator: get("COORDINATOR_AGENT_ID").unwrap_or(defaults.coordinator),
            communication: get("COMMUNICATION_AGENT_ID").unwrap_or(defaults.communication),
            aggregation: get("AGGREGATION_AGENT_ID").unwrap_or(defaults.aggregation),
            dashboard: get("DASHBOARD_AGENT_ID"),
        };

        let agent_api_url = get("AGENT_API_URL").unwrap_or_else(|| {
            tracing::warn!("AGENT_API_URL not set, using default");
            DEFAULT_AGENT_API_URL.to_string()
        });

        Ok(Self {
            bind_addr: parse_or(
                "BIND_ADDR",
                get("BIND_ADDR"),
                SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            )?,
            agent_api_url,
            agent_api_key: get("AGENT_API_KEY"),
            agents,
            reply_wait: Duration::from_millis(parse_or(
                "REPLY_WAIT_MS",
                get("REPLY_WAIT_MS"),
                DEFAULT_REPLY_WAIT_MS,
            )?),
            agent_timeout: Duration::from_secs(parse_or(
                "AGENT_TIMEOUT_SECS",
                get("AGENT_TIMEOUT_SECS"),
                DEFAULT_AGENT_TIMEOUT_SECS,
            )?),
            member_email_domain: get("MEMBER_EMAIL_DOMAIN")
                .unwrap_or_else(|| DEFAULT_EMAIL_DOMAIN.to_string()),
        })
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> AgentResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|e| AgentError::ConfigError(format!("{} has invalid value {:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}
