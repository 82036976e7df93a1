use async_trait::async_trait;

use crate::domain::team::events::RosterEvent;
use crate::domain::team::TeamMember;

/// Repository trait for the Roster aggregate
///
/// Defines the contract for reading and editing the team roster.
/// Members are addressed by position.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Snapshot of the current members, in roster order
    async fn list(&self) -> Result<Vec<TeamMember>, String>;

    /// Append a member derived from a display name
    async fn add_member(&self, name: &str) -> Result<(TeamMember, RosterEvent), String>;

    /// Remove the member at a position
    async fn remove_member(&self, index: usize) -> Result<RosterEvent, String>;

    /// Number of members currently on the roster
    async fn count(&self) -> Result<usize, String> {
        Ok(self.list().await?.len())
    }
}
