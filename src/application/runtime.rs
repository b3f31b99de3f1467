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

//! # Runtime Context
//!
//! This module acts as the "Engine Room" of the application. It sets up the
//! resources the pipeline needs to run:
//! 1. **Thread Pool**: the `rayon` pool that publishes partitions in parallel.
//! 2. **Async Runtime**: a `tokio` runtime that drives the MySQL driver and
//!    the AWS SDK from those synchronous workers.
//! 3. **CPU Scaling**: worker count derived from the available cores.

use crate::config::JobConfig;
use crate::domain::errors::{JobError, Result};
use log::info;
use tokio::runtime::{Builder, Handle, Runtime};

/// Default share of CPU cores used when neither `parallel` nor `cpu_percent` is set.
const DEFAULT_CPU_PERCENT: u8 = 50;

/// `RuntimeContext` holds shared resources that exist for the entire life of the job.
pub struct RuntimeContext {
    runtime: Runtime,
    /// How many partitions the snapshot is split into.
    pub num_partitions: usize,
}

impl RuntimeContext {
    /// Initializes the global thread pool and the async runtime.
    pub fn init(config: &JobConfig) -> Result<Self> {
        let num_threads = worker_count(
            config.execution.parallel,
            config.execution.cpu_percent,
            num_cpus::get(),
        );
        let cpu_percent = config.execution.cpu_percent.unwrap_or(DEFAULT_CPU_PERCENT);

        info!(
            "Initializing worker pool with {} threads (Target CPU: {}%)",
            num_threads, cpu_percent
        );

        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .unwrap_or_else(|e| {
                info!("Global thread pool already initialized: {}", e);
            });

        let runtime = Builder::new_multi_thread()
            .enable_all()
            .thread_name("publisher-io")
            .build()
            .map_err(|e| JobError::RuntimeError(format!("Failed to start async runtime: {}", e)))?;

        // Without an explicit hint, one partition per worker keeps every thread busy.
        let num_partitions = config.execution.partitions.unwrap_or(num_threads).max(1);

        Ok(Self {
            runtime,
            num_partitions,
        })
    }

    /// Handle used by adapters to block on async driver calls.
    pub fn handle(&self) -> Handle {
        self.runtime.handle().clone()
    }
}

/// Computes the worker count: explicit `parallel`, else a share of the cores. Always at least 1.
pub fn worker_count(parallel: Option<usize>, cpu_percent: Option<u8>, total_cpus: usize) -> usize {
    let cpu_percent = cpu_percent.unwrap_or(DEFAULT_CPU_PERCENT);
    let n = parallel
        .unwrap_or_else(|| (total_cpus as f64 * (cpu_percent as f64 / 100.0)).ceil() as usize);
    std::cmp::max(1, n)
}
