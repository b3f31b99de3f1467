//! Ports: the contracts the orchestrator depends on.

pub mod completion_port;
pub mod publish_port;
pub mod source_port;
