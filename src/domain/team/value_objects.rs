use serde::{Deserialize, Serialize};
use std::fmt;

/// Email value object for a team member's address
///
/// # Invariants
/// - Must contain '@' character
/// - Must be at least 3 characters long
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use pulse_api::domain::team::value_objects::Email;
    ///
    /// let email = Email::new("alice@company.com").expect("valid email");
    /// assert_eq!(email.as_str(), "alice@company.com");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into();
        if Self::is_valid(&email) {
            Ok(Email(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    fn is_valid(email: &str) -> bool {
        email.contains('@') && email.len() >= 3
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// Messaging handle used to reach a member on Slack (`@alice`)
///
/// # Invariants
/// - Always starts with '@'
/// - Contains no whitespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlackHandle(String);

impl SlackHandle {
    /// Parses an explicit handle, adding the leading '@' if missing
    pub fn new(handle: impl Into<String>) -> Result<Self, String> {
        let handle = handle.into();
        let bare = handle.trim().trim_start_matches('@');

        if bare.is_empty() {
            return Err("Slack handle cannot be empty".to_string());
        }
        if bare.chars().any(char::is_whitespace) {
            return Err(format!("Slack handle cannot contain whitespace: {}", handle));
        }

        Ok(SlackHandle(format!("@{}", bare)))
    }

    /// Derives a handle from a display name: lowercase, whitespace removed
    ///
    /// ```
    /// use pulse_api::domain::team::value_objects::SlackHandle;
    ///
    /// let handle = SlackHandle::from_name("Dana  Lee").expect("valid handle");
    /// assert_eq!(handle.as_str(), "@danalee");
    /// ```
    pub fn from_name(name: &str) -> Result<Self, String> {
        let compact: String = name
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        Self::new(compact)
    }

    /// Returns the handle including the leading '@'
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the handle without the leading '@'
    pub fn username(&self) -> &str {
        &self.0[1..]
    }
}

impl fmt::Display for SlackHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SlackHandle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SlackHandle::new(value)
    }
}

impl From<SlackHandle> for String {
    fn from(handle: SlackHandle) -> Self {
        handle.0
    }
}
