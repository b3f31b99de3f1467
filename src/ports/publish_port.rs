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

//! # Publish Port
//!
//! The contract for the streaming destination: take a batch of
//! (payload, partition key) records and send them to a named stream in a
//! single call.

use crate::domain::entities::{PublishOutcome, TransportRecord};
use crate::domain::errors::Result;

/// `PublishPort` is shared by every partition worker.
pub trait PublishPort: Send + Sync {
    /// Publishes the whole batch in one call. The batch size is not capped.
    fn put_records(&self, stream: &str, records: Vec<TransportRecord>) -> Result<PublishOutcome>;
}
