// Repository interfaces (ports)
// Implementations live in the infrastructure layer

pub mod roster_repository;

pub use roster_repository::RosterRepository;
