use serde::{Deserialize, Serialize};

use super::value_objects::{Email, SlackHandle};

/// A person whose weekly metrics the workflow collects
///
/// Members are identified only by roster position; two members may share a
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    name: String,
    slack_id: SlackHandle,
    email: Email,
}

impl TeamMember {
    /// Creates a member from explicit parts
    pub fn new(name: impl Into<String>, slack_id: SlackHandle, email: Email) -> Result<Self, String> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err("Member name cannot be empty".to_string());
        }

        Ok(Self {
            name,
            slack_id,
            email,
        })
    }

    /// Creates a member from a display name alone
    ///
    /// The Slack handle is the lowercased name without whitespace and the
    /// email is `<handle>@<email_domain>`.
    ///
    /// # Example
    /// ```
    /// use pulse_api::domain::team::TeamMember;
    ///
    /// let member = TeamMember::from_name("Dana Lee", "company.com").expect("valid member");
    /// assert_eq!(member.slack_id().as_str(), "@danalee");
    /// assert_eq!(member.email().as_str(), "danalee@company.com");
    /// ```
    pub fn from_name(name: &str, email_domain: &str) -> Result<Self, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Member name cannot be empty".to_string());
        }

        let slack_id = SlackHandle::from_name(name)?;
        let email = Email::new(format!("{}@{}", slack_id.username(), email_domain))?;

        Self::new(name, slack_id, email)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slack_id(&self) -> &SlackHandle {
        &self.slack_id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }
}

/// Returns the first whitespace-separated word of a name
pub fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}
