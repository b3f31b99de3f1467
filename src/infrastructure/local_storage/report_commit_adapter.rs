//! Completion signal: logs the job outcome and optionally writes a JSON run report.

use crate::domain::entities::JobSummary;
use crate::domain::errors::{JobError, Result};
use crate::ports::completion_port::CompletionPort;
use log::info;
use serde_json::json;
use std::path::{Path, PathBuf};

/// `CompletionPort` implementation that records the run on local disk.
pub struct ReportCommitAdapter {
    report_dir: Option<String>,
}

impl ReportCommitAdapter {
    pub fn new(report_dir: Option<String>) -> Self {
        Self { report_dir }
    }

    fn write_report(&self, dir: &str, summary: &JobSummary) -> Result<PathBuf> {
        let successful = summary
            .partitions
            .iter()
            .filter(|p| p.is_success())
            .count();

        let report = json!({
            "summary": {
                "job_name": summary.job_name,
                "table": summary.table,
                "stream": summary.stream,
                "partitions": summary.partitions.len(),
                "successful_partitions": successful,
                "total_rows": summary.total_rows,
                "total_published": summary.total_published,
                "publish_calls": summary.publish_calls,
                "failed_records": summary.failed_records,
                "total_duration_seconds": summary.duration_seconds,
                "records_per_sec": if summary.duration_seconds > 0.0 {
                    summary.total_published as f64 / summary.duration_seconds
                } else {
                    0.0
                }
            },
            "details": summary.partitions
        });

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = Path::new(dir).join(format!(
            "report_{}_{}.json",
            sanitize(&summary.job_name),
            timestamp
        ));

        std::fs::create_dir_all(dir)?;
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, &report)
            .map_err(|e| JobError::CommitError(e.to_string()))?;

        Ok(path)
    }
}

/// Keeps job names safe to use inside a file name.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl CompletionPort for ReportCommitAdapter {
    fn commit(&self, summary: &JobSummary) -> Result<()> {
        if let Some(dir) = &self.report_dir {
            let path = self.write_report(dir, summary)?;
            info!("Run report written to {}", path.display());
        }
        info!(
            "Job {} committed: {} rows, {} records published to {} in {} calls.",
            summary.job_name,
            summary.total_rows,
            summary.total_published,
            summary.stream,
            summary.publish_calls
        );
        Ok(())
    }
}
