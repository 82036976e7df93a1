use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::repositories::RosterRepository;
use crate::domain::team::events::RosterEvent;
use crate::domain::team::{Roster, TeamMember};

/// In-memory implementation of RosterRepository
///
/// The roster lives only for the lifetime of the process.
pub struct InMemoryRosterRepository {
    roster: RwLock<Roster>,
}

impl InMemoryRosterRepository {
    /// Creates a repository around an existing roster
    ///
    /// # Arguments
    /// * `roster` - Initial roster contents
    pub fn new(roster: Roster) -> Self {
        Self {
            roster: RwLock::new(roster),
        }
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterRepository {
    async fn list(&self) -> Result<Vec<TeamMember>, String> {
        Ok(self.roster.read().await.members().to_vec())
    }

    async fn add_member(&self, name: &str) -> Result<(TeamMember, RosterEvent), String> {
        let mut roster = self.roster.write().await;
        let event = roster.add_member(name)?;
        let member = roster
            .members()
            .get(event.index())
            .cloned()
            .ok_or_else(|| format!("Member {} missing after insert", event.index()))?;

        tracing::debug!(index = event.index(), name = %member.name(), "Member added to roster");
        Ok((member, event))
    }

    async fn remove_member(&self, index: usize) -> Result<RosterEvent, String> {
        let event = self.roster.write().await.remove_member(index)?;

        tracing::debug!(index, name = %event.member_name(), "Member removed from roster");
        Ok(event)
    }

    async fn count(&self) -> Result<usize, String> {
        Ok(self.roster.read().await.len())
    }
}
