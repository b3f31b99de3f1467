// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core error definitions for the table publisher.
//!
//! This module provides a centralized `JobError` enum and a `Result` type
//! used throughout the application to handle configuration, source,
//! destination and I/O errors.

use thiserror::Error;

/// Error types encountered while running the job.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Argument parsing failure, including `--help` and `--version` output.
    #[error(transparent)]
    CliError(#[from] clap::Error),

    #[error("Source connection error: {0}")]
    ConnectionError(String),

    #[error("Read failed for {table}: {reason}")]
    ReadError { table: String, reason: String },

    #[error("Publish to {stream} failed: {reason}")]
    PublishError { stream: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Commit failed: {0}")]
    CommitError(String),

    #[error("{failed} of {total} partitions failed: {details}")]
    PartitionFailures {
        failed: usize,
        total: usize,
        details: String,
    },

    #[error("Runtime error: {0}")]
    RuntimeError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for JobError {
    fn from(e: serde_json::Error) -> Self {
        JobError::SerializationError(e.to_string())
    }
}

/// A specialized Result type for the table publisher.
pub type Result<T> = std::result::Result<T, JobError>;
