//! Domain layer: entities, payload mapping, partition keys and errors.

pub mod entities;
pub mod errors;
pub mod mapping;
pub mod partition_key;
