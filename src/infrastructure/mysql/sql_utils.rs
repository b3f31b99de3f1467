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

use crate::domain::errors::{JobError, Result};

/// Quotes a single MySQL identifier with backticks.
///
/// Embedded backticks are doubled, which is the only escape MySQL needs
/// inside a quoted identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quotes a possibly schema-qualified table name (`schema.table`).
pub fn quote_table_name(table: &str) -> Result<String> {
    let parts: Vec<&str> = table.split('.').map(str::trim).collect();
    if parts.is_empty() || parts.len() > 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(JobError::ConfigError(format!(
            "invalid table name '{}'",
            table
        )));
    }
    Ok(parts
        .iter()
        .map(|p| quote_identifier(p))
        .collect::<Vec<_>>()
        .join("."))
}

/// Builds the full-table read: no WHERE, no ORDER BY, no LIMIT.
pub fn build_full_table_select(table: &str) -> Result<String> {
    Ok(format!("SELECT * FROM {}", quote_table_name(table)?))
}
