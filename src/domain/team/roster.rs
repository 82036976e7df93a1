use super::events::RosterEvent;
use super::member::TeamMember;
use super::value_objects::{Email, SlackHandle};

/// Default domain for derived member email addresses
pub const DEFAULT_EMAIL_DOMAIN: &str = "company.com";

/// Roster aggregate root
///
/// The ordered list of members the weekly workflow reaches out to.
///
/// # Invariants
/// - Every member has a non-empty name, a valid handle and a valid email
/// - Members are addressed by position; duplicates are allowed
///
/// # Example
/// ```
/// use pulse_api::domain::team::Roster;
///
/// let mut roster = Roster::with_defaults("company.com");
/// assert_eq!(roster.len(), 3);
///
/// let event = roster.add_member("Dana Lee").expect("valid name");
/// assert_eq!(event.index(), 3);
/// assert_eq!(roster.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Roster {
    members: Vec<TeamMember>,
    email_domain: String,
}

impl Roster {
    /// Creates an empty roster
    pub fn new(email_domain: impl Into<String>) -> Self {
        Self {
            members: Vec::new(),
            email_domain: email_domain.into(),
        }
    }

    /// Creates the starter roster of three members
    pub fn with_defaults(email_domain: impl Into<String>) -> Self {
        let email_domain = email_domain.into();
        let members = [
            ("Alice Johnson", "@alice"),
            ("Bob Smith", "@bob"),
            ("Carol White", "@carol"),
        ]
        .into_iter()
        .filter_map(|(name, handle)| {
            let slack_id = SlackHandle::new(handle).ok()?;
            let email = Email::new(format!("{}@{}", slack_id.username(), email_domain)).ok()?;
            TeamMember::new(name, slack_id, email).ok()
        })
        .collect();

        Self {
            members,
            email_domain,
        }
    }

    /// Appends a member derived from a display name
    ///
    /// # Business Rules
    /// - Blank names are rejected
    /// - Handle and email are derived from the name
    pub fn add_member(&mut self, name: &str) -> Result<RosterEvent, String> {
        let member = TeamMember::from_name(name, &self.email_domain)?;
        Ok(self.push(member))
    }

    fn push(&mut self, member: TeamMember) -> RosterEvent {
        let event = RosterEvent::MemberAdded {
            index: self.members.len(),
            name: member.name().to_string(),
        };
        self.members.push(member);
        event
    }

    /// Removes the member at `index`
    pub fn remove_member(&mut self, index: usize) -> Result<RosterEvent, String> {
        if index >= self.members.len() {
            return Err(format!(
                "Member index {} not found (roster has {} members)",
                index,
                self.members.len()
            ));
        }

        let removed = self.members.remove(index);
        Ok(RosterEvent::MemberRemoved {
            index,
            name: removed.name().to_string(),
        })
    }

    // ===== Getters =====

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_EMAIL_DOMAIN)
    }
}
