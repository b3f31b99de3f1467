//! Command line entry point: resolve the job, wire the adapters, run it.

use table_stream_publisher::application::orchestrator::Orchestrator;
use table_stream_publisher::application::runtime::RuntimeContext;
use table_stream_publisher::config::resolve_configuration;
use table_stream_publisher::domain::errors::JobError;
use table_stream_publisher::infrastructure::kinesis::kinesis_publish_adapter::KinesisPublishAdapter;
use table_stream_publisher::infrastructure::local_storage::report_commit_adapter::ReportCommitAdapter;
use table_stream_publisher::infrastructure::mysql::connection_registry::ConnectionRegistry;
use table_stream_publisher::infrastructure::mysql::mysql_source_adapter::MySqlSourceAdapter;
use log::{error, info};
use std::process;
use std::sync::Arc;

fn main() {
    // 1. Initialize Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Parse Arguments & Resolve Config
    let config = match resolve_configuration(std::env::args_os()) {
        Ok(c) => c,
        // Help, version and malformed flags are printed by clap itself.
        Err(JobError::CliError(e)) => e.exit(),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    // 3. Setup Runtime
    let runtime = match RuntimeContext::init(&config) {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to initialize runtime: {}", e);
            process::exit(1);
        }
    };

    // 4. Initialize Hexagonal Components
    let source = Arc::new(MySqlSourceAdapter::new(
        ConnectionRegistry::new(config.connections.clone()),
        runtime.handle(),
        runtime.num_partitions,
    ));
    let publisher = Arc::new(KinesisPublishAdapter::connect(
        runtime.handle(),
        &config.destination,
    ));
    let completion = Arc::new(ReportCommitAdapter::new(config.report_dir.clone()));

    // 5. Run Orchestrator
    let orchestrator = Orchestrator::new(source, publisher, completion, config);

    match orchestrator.run() {
        Ok(summary) => {
            info!(
                "Job finished. {} rows published in {} calls ({:.2}s).",
                summary.total_published, summary.publish_calls, summary.duration_seconds
            );
        }
        Err(e) => {
            error!("Job failed: {}", e);
            process::exit(1);
        }
    }
}
