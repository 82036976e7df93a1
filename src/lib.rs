//! Pulse API Library
//!
//! Weekly marketing-metrics collection: a roster of team members, an agent
//! workflow that gathers and aggregates their numbers, and the dashboard
//! built from the result.

pub mod agents;
pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
