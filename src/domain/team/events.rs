use serde::Serialize;

/// Domain events that occur within the Roster aggregate
///
/// Roster edits are local state changes. The HTTP layer logs every event
/// and returns the `MemberAdded` event with the new member.
///
/// # Example
/// ```
/// use pulse_api::domain::team::events::RosterEvent;
///
/// let event = RosterEvent::MemberAdded {
///     index: 3,
///     name: "Dana Lee".to_string(),
/// };
/// assert_eq!(event.index(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RosterEvent {
    /// Fired when a member is appended to the roster
    MemberAdded {
        /// Position the member now occupies
        index: usize,
        /// Display name of the new member
        name: String,
    },
    /// Fired when a member is removed by position
    MemberRemoved {
        /// Position the member occupied before removal
        index: usize,
        /// Display name of the removed member
        name: String,
    },
}

impl RosterEvent {
    /// Returns the roster position this event refers to
    pub fn index(&self) -> usize {
        match self {
            RosterEvent::MemberAdded { index, .. } => *index,
            RosterEvent::MemberRemoved { index, .. } => *index,
        }
    }

    /// Returns the member name this event refers to
    pub fn member_name(&self) -> &str {
        match self {
            RosterEvent::MemberAdded { name, .. } => name,
            RosterEvent::MemberRemoved { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_added_event() {
        let event = RosterEvent::MemberAdded {
            index: 0,
            name: "Alice Johnson".to_string(),
        };

        assert_eq!(event.index(), 0);
        assert_eq!(event.member_name(), "Alice Johnson");
    }

    #[test]
    fn member_removed_event() {
        let event = RosterEvent::MemberRemoved {
            index: 2,
            name: "Carol White".to_string(),
        };

        assert_eq!(event.index(), 2);
        assert_eq!(event.member_name(), "Carol White");
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = RosterEvent::MemberAdded {
            index: 1,
            name: "Bob Smith".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "member_added");
        assert_eq!(json["index"], 1);
    }
}
