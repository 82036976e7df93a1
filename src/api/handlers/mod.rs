// HTTP handlers, one module per resource

pub mod dashboard;
pub mod health;
pub mod roster;
pub mod workflow;
