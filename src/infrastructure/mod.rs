//! Concrete adapters for the ports.

pub mod kinesis;
pub mod local_storage;
pub mod mysql;
