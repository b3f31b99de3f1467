//! Application layer: runtime setup and the pipeline orchestrator.

pub mod orchestrator;
pub mod runtime;
