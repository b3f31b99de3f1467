//! # Table Stream Publisher
//!
//! Reads a full snapshot of one relational table, turns every row into a
//! JSON record with a random partition key, and publishes the records to a
//! Kinesis data stream in one batch per partition.
//!
//! This crate follows the **Hexagonal Architecture** (Ports and Adapters)
//! to keep the pipeline independent of the concrete source and destination.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;
