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

//! # Completion Port
//!
//! Signals that the job finished its work. This is not a data transaction:
//! nothing is rolled back if a later step fails.

use crate::domain::entities::JobSummary;
use crate::domain::errors::Result;

pub trait CompletionPort: Send + Sync {
    /// Marks the job as complete.
    fn commit(&self, summary: &JobSummary) -> Result<()>;
}
