// Team domain module
// Contains the roster aggregate root, members, value objects, and domain events

pub mod events;
pub mod member;
pub mod roster;
pub mod value_objects;

// Re-export main types for convenience
pub use member::TeamMember;
pub use roster::Roster;
pub use value_objects::{Email, SlackHandle};
