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

//! # Source Port
//!
//! This Port defines what it means to "read a table" from the relational
//! source. It doesn't care IF the database is MySQL or a Mock for testing.

use crate::domain::entities::Dataset;
use crate::domain::errors::Result;

/// `SourcePort` reads a full table snapshot.
///
/// We add `: Send + Sync` here so the adapter can be shared behind an `Arc`.
pub trait SourcePort: Send + Sync {
    /// Reads every row of `table` through the named connection.
    ///
    /// No filter, sampling or ordering is applied. The returned dataset is
    /// already split into disjoint partitions.
    fn read_table(&self, connection: &str, table: &str) -> Result<Dataset>;
}
