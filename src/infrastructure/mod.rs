// Infrastructure layer module
// Contains storage adapters and external service integrations
// Follows Hexagonal Architecture

pub mod http_agent_invoker;
pub mod repositories;

pub use http_agent_invoker::HttpAgentInvoker;
