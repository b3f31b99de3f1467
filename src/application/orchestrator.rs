//! The core application logic that moves one table snapshot onto a stream.
//!
//! This module coordinates between the source, the stream publisher and the
//! completion signal: read the table, publish every partition in parallel,
//! then commit.

use crate::config::JobConfig;
use crate::domain::entities::{Dataset, JobSummary, PartitionResult, Record, TransportRecord};
use crate::domain::errors::{JobError, Result};
use crate::ports::completion_port::CompletionPort;
use crate::ports::publish_port::PublishPort;
use crate::ports::source_port::SourcePort;
use log::{error, info};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

/// Orchestrates the read → publish → commit pipeline for a single table.
pub struct Orchestrator {
    source: Arc<dyn SourcePort>,
    publisher: Arc<dyn PublishPort>,
    completion: Arc<dyn CompletionPort>,
    config: JobConfig,
}

impl Orchestrator {
    /// Creates a new Orchestrator with the provided components.
    pub fn new(
        source: Arc<dyn SourcePort>,
        publisher: Arc<dyn PublishPort>,
        completion: Arc<dyn CompletionPort>,
        config: JobConfig,
    ) -> Self {
        Self {
            source,
            publisher,
            completion,
            config,
        }
    }

    /// Entry point for running the whole job.
    ///
    /// Partitions are published independently. A failed partition does not
    /// stop its siblings, but it does fail the job: no commit is issued and
    /// nothing is retried.
    pub fn run(&self) -> Result<JobSummary> {
        let start_time = Instant::now();
        info!(
            "Starting job {}: {} -> {}",
            self.config.job_name, self.config.table_name, self.config.kinesis_stream
        );

        let dataset = self
            .source
            .read_table(&self.config.source_connection, &self.config.table_name)?;
        self.show(&dataset);

        let results: Vec<PartitionResult> = dataset
            .partitions
            .par_iter()
            .enumerate()
            .map(|(id, rows)| {
                let started = Instant::now();
                match self.publish_partition(id, rows) {
                    Ok(res) => res,
                    Err(e) => {
                        error!("Partition {} failed: {}", id, e);
                        PartitionResult::failure(
                            id,
                            rows.len() as u64,
                            started.elapsed().as_secs_f64(),
                            e.to_string(),
                        )
                    }
                }
            })
            .collect();

        let summary = JobSummary::new(
            &self.config.job_name,
            &self.config.table_name,
            &self.config.kinesis_stream,
            results,
            start_time.elapsed().as_secs_f64(),
        );

        let failures: Vec<String> = summary
            .partitions
            .iter()
            .filter(|p| !p.is_success())
            .map(|p| {
                format!(
                    "partition {}: {}",
                    p.partition_id,
                    p.error.as_deref().unwrap_or("unknown error")
                )
            })
            .collect();
        if !failures.is_empty() {
            return Err(JobError::PartitionFailures {
                failed: failures.len(),
                total: summary.partitions.len(),
                details: failures.join("; "),
            });
        }

        self.completion.commit(&summary)?;
        Ok(summary)
    }

    /// Publishes one partition as a single batch.
    ///
    /// Every row becomes one transport record with a fresh partition key.
    /// An empty partition makes no call at all.
    pub fn publish_partition(&self, partition_id: usize, rows: &[Record]) -> Result<PartitionResult> {
        let start_time = Instant::now();

        let batch = rows
            .iter()
            .map(TransportRecord::from_record)
            .collect::<Result<Vec<_>>>()?;

        if batch.is_empty() {
            return Ok(PartitionResult::success(partition_id, 0, 0, 0, 0.0));
        }

        let count = batch.len() as u64;
        let outcome = self
            .publisher
            .put_records(&self.config.kinesis_stream, batch)?;

        info!(
            "Partition {}: published {} records to {}",
            partition_id, count, self.config.kinesis_stream
        );

        Ok(PartitionResult::success(
            partition_id,
            count,
            1,
            outcome.failed_records,
            start_time.elapsed().as_secs_f64(),
        ))
    }

    /// Logs the first `show_rows` rows of the snapshot.
    fn show(&self, dataset: &Dataset) {
        info!(
            "{}: {} rows in {} partitions, columns: [{}]",
            dataset.table,
            dataset.row_count(),
            dataset.partitions.len(),
            dataset.columns.join(", ")
        );
        for record in dataset.rows().take(self.config.show_rows) {
            info!("  {}", record);
        }
    }
}
