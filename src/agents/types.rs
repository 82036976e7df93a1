use serde::{Deserialize, Serialize};

/// The four agents a workflow run talks to, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Coordinator,
    Communication,
    Aggregation,
    Dashboard,
}

impl AgentRole {
    pub const ALL: [AgentRole; 4] = [
        AgentRole::Coordinator,
        AgentRole::Communication,
        AgentRole::Aggregation,
        AgentRole::Dashboard,
    ];
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentRole::Coordinator => write!(f, "coordinator"),
            AgentRole::Communication => write!(f, "communication"),
            AgentRole::Aggregation => write!(f, "aggregation"),
            AgentRole::Dashboard => write!(f, "dashboard"),
        }
    }
}

/// Remote identifiers of the agents a run invokes
///
/// The dashboard agent is optional; without it the run ends after
/// aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIds {
    pub coordinator: String,
    pub communication: String,
    pub aggregation: String,
    pub dashboard: Option<String>,
}

impl AgentIds {
    pub fn for_role(&self, role: AgentRole) -> Option<&str> {
        match role {
            AgentRole::Coordinator => Some(&self.coordinator),
            AgentRole::Communication => Some(&self.communication),
            AgentRole::Aggregation => Some(&self.aggregation),
            AgentRole::Dashboard => self.dashboard.as_deref(),
        }
    }
}

impl Default for AgentIds {
    fn default() -> Self {
        Self {
            coordinator: "68fd3f07058210757bf6403f".to_string(),
            communication: "68fd3f1171c6b27d6c8eb882".to_string(),
            aggregation: "68fd3f1ba39d463331e037a4".to_string(),
            dashboard: None,
        }
    }
}

/// Raw reply from an agent invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    pub response: String,
}

/// Coordinator's acknowledgement that the run is validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorAck {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl CoordinatorAck {
    pub fn fallback() -> Self {
        Self {
            status: "queued".to_string(),
            message: "Coordinator validated workflow".to_string(),
        }
    }
}

/// Communication agent's delivery receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationReceipt {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub delivery_count: usize,
    #[serde(default)]
    pub message: String,
}

impl CommunicationReceipt {
    pub fn fallback(delivery_count: usize) -> Self {
        Self {
            status: "sent".to_string(),
            delivery_count,
            message: "Messages sent to all team members".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_display() {
        assert_eq!(AgentRole::Coordinator.to_string(), "coordinator");
        assert_eq!(AgentRole::Dashboard.to_string(), "dashboard");
    }

    #[test]
    fn dashboard_id_is_optional() {
        let ids = AgentIds::default();

        assert!(ids.for_role(AgentRole::Coordinator).is_some());
        assert!(ids.for_role(AgentRole::Dashboard).is_none());
    }

    #[test]
    fn receipt_fallback_counts_members() {
        let receipt = CommunicationReceipt::fallback(4);

        assert_eq!(receipt.status, "sent");
        assert_eq!(receipt.delivery_count, 4);
    }

    #[test]
    fn receipt_uses_camel_case() {
        let json = serde_json::to_value(CommunicationReceipt::fallback(2)).unwrap();
        assert_eq!(json["deliveryCount"], 2);
    }
}
