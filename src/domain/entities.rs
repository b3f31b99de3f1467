//! # Domain Entities
//!
//! Entities are the "Nouns" of the job: source rows, the records we send to
//! the stream, the partitioned dataset, and the per-partition results.
//!
//! The result types derive `serde::Serialize` so they can be written
//! straight into the JSON run report.

use crate::domain::errors::Result;
use crate::domain::{mapping, partition_key};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// A single column value read from the source table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Exact numerics are carried as their decimal text to avoid precision loss.
    Decimal(String),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// One row of the source table: an ordered mapping from column name to value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a column by name.
    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// Renders the complete field mapping as a JSON object, in column order.
    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(&mapping::record_to_json(self))?)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_payload() {
            Ok(p) => write!(f, "{}", p),
            Err(_) => write!(f, "{:?}", self.fields),
        }
    }
}

/// A record ready for the stream: opaque payload plus partition key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransportRecord {
    pub payload: String,
    pub partition_key: String,
}

impl TransportRecord {
    /// Serializes `record` and attaches a freshly generated partition key.
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            payload: record.to_payload()?,
            partition_key: partition_key::generate(),
        })
    }
}

/// A fully materialized table snapshot split into disjoint partitions.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub table: String,
    pub columns: Vec<String>,
    pub partitions: Vec<Vec<Record>>,
}

impl Dataset {
    /// Splits `rows` into at most `partitions` contiguous, disjoint chunks.
    ///
    /// Chunk sizes differ by at most one row. An empty table still yields a
    /// single (empty) partition so the publish step sees the same shape for
    /// every table.
    pub fn from_rows(
        table: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Record>,
        partitions: usize,
    ) -> Self {
        let table = table.into();
        let n = partitions.max(1).min(rows.len().max(1));
        let base = rows.len() / n;
        let extra = rows.len() % n;

        let mut out = Vec::with_capacity(n);
        let mut iter = rows.into_iter();
        for i in 0..n {
            let size = base + usize::from(i < extra);
            out.push(iter.by_ref().take(size).collect());
        }

        Self {
            table,
            columns,
            partitions: out,
        }
    }

    /// Builds a dataset from explicit partitions, kept as given.
    #[cfg(test)]
    pub fn with_partitions(
        table: impl Into<String>,
        columns: Vec<String>,
        partitions: Vec<Vec<Record>>,
    ) -> Self {
        Self {
            table: table.into(),
            columns,
            partitions,
        }
    }

    pub fn row_count(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    /// Iterates over rows across partitions, partition by partition.
    pub fn rows(&self) -> impl Iterator<Item = &Record> {
        self.partitions.iter().flatten()
    }
}

/// What the destination reported for a single batch call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Entries the destination accepted the call for but did not store.
    pub failed_records: u64,
}

/// Outcome status of a partition.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartitionStatus {
    Success,
    Failed,
}

impl fmt::Display for PartitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionStatus::Success => write!(f, "SUCCESS"),
            PartitionStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Captures the outcome of publishing one partition.
#[derive(Debug, Clone, Serialize)]
pub struct PartitionResult {
    pub partition_id: usize,
    /// Rows read for this partition.
    pub rows: u64,
    /// Transport records handed to the destination.
    pub published: u64,
    /// Number of batch calls issued (0 or 1).
    pub publish_calls: u64,
    /// Entries rejected by the destination inside an accepted call.
    pub failed_records: u64,
    /// Wall-clock time in seconds.
    pub duration: f64,
    pub status: PartitionStatus,
    pub error: Option<String>,
}

impl PartitionResult {
    pub fn success(
        partition_id: usize,
        rows: u64,
        publish_calls: u64,
        failed_records: u64,
        duration: f64,
    ) -> Self {
        Self {
            partition_id,
            rows,
            published: if publish_calls > 0 { rows } else { 0 },
            publish_calls,
            failed_records,
            duration,
            status: PartitionStatus::Success,
            error: None,
        }
    }

    pub fn failure(partition_id: usize, rows: u64, duration: f64, error: String) -> Self {
        Self {
            partition_id,
            rows,
            published: 0,
            publish_calls: 0,
            failed_records: 0,
            duration,
            status: PartitionStatus::Failed,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PartitionStatus::Success
    }
}

/// Job-level aggregate handed to the completion signal.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub job_name: String,
    pub table: String,
    pub stream: String,
    pub total_rows: u64,
    pub total_published: u64,
    pub publish_calls: u64,
    pub failed_records: u64,
    pub duration_seconds: f64,
    pub partitions: Vec<PartitionResult>,
}

impl JobSummary {
    pub fn new(
        job_name: &str,
        table: &str,
        stream: &str,
        mut partitions: Vec<PartitionResult>,
        duration_seconds: f64,
    ) -> Self {
        partitions.sort_by_key(|p| p.partition_id);
        Self {
            job_name: job_name.to_string(),
            table: table.to_string(),
            stream: stream.to_string(),
            total_rows: partitions.iter().map(|p| p.rows).sum(),
            total_published: partitions.iter().map(|p| p.published).sum(),
            publish_calls: partitions.iter().map(|p| p.publish_calls).sum(),
            failed_records: partitions.iter().map(|p| p.failed_records).sum(),
            duration_seconds,
            partitions,
        }
    }
}
