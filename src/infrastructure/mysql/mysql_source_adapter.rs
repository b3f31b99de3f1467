//! Infrastructure adapter for reading a full table snapshot from MySQL.

use crate::domain::entities::{Dataset, Record};
use crate::domain::errors::{JobError, Result};
use crate::infrastructure::mysql::connection_registry::ConnectionRegistry;
use crate::infrastructure::mysql::sql_utils::build_full_table_select;
use crate::infrastructure::mysql::value_conversion::{convert_value, ColumnKind};
use crate::ports::source_port::SourcePort;
use log::{debug, info};
use mysql_async::prelude::*;
use mysql_async::{Column, Conn, Row};
use std::time::Instant;
use tokio::runtime::Handle;

/// Concrete implementation of `SourcePort` for MySQL-compatible databases.
///
/// The whole table is read in one query and materialized in memory, then
/// split into `partitions` disjoint chunks for the publish step.
pub struct MySqlSourceAdapter {
    registry: ConnectionRegistry,
    handle: Handle,
    partitions: usize,
}

impl MySqlSourceAdapter {
    pub fn new(registry: ConnectionRegistry, handle: Handle, partitions: usize) -> Self {
        Self {
            registry,
            handle,
            partitions,
        }
    }

    async fn fetch(&self, connection: &str, table: &str) -> Result<(Vec<String>, Vec<Record>)> {
        let opts = self.registry.resolve(connection)?;
        let sql = build_full_table_select(table)?;
        let read_err = |e: mysql_async::Error| JobError::ReadError {
            table: table.to_string(),
            reason: e.to_string(),
        };

        let mut conn = Conn::new(opts).await.map_err(|e| {
            JobError::ConnectionError(format!("Failed to connect via '{}': {}", connection, e))
        })?;

        debug!("Executing: {}", sql);
        let (columns, rows) = {
            let mut result = conn.query_iter(sql).await.map_err(read_err)?;
            // Taken from the result set header so an empty table keeps its schema.
            let columns = column_names(result.columns().as_deref());
            let rows: Vec<Row> = result.collect_and_drop().await.map_err(read_err)?;
            (columns, rows)
        };
        conn.disconnect().await.map_err(read_err)?;

        let records = rows.into_iter().map(row_to_record).collect();
        Ok((columns, records))
    }
}

fn column_names(columns: Option<&[Column]>) -> Vec<String> {
    columns
        .unwrap_or_default()
        .iter()
        .map(|c| c.name_str().into_owned())
        .collect()
}

/// Pairs each value with its column name, keeping the select order.
fn row_to_record(row: Row) -> Record {
    let columns = row.columns();
    let values = row.unwrap_raw();
    let fields = columns
        .iter()
        .zip(values)
        .map(|(col, val)| {
            let val = val.unwrap_or(mysql_async::Value::NULL);
            (
                col.name_str().into_owned(),
                convert_value(ColumnKind::of(col), val),
            )
        })
        .collect();
    Record::new(fields)
}

impl SourcePort for MySqlSourceAdapter {
    fn read_table(&self, connection: &str, table: &str) -> Result<Dataset> {
        let start_time = Instant::now();
        info!("Reading {} via connection '{}'", table, connection);

        let (columns, records) = self.handle.block_on(self.fetch(connection, table))?;
        let row_count = records.len();
        let dataset = Dataset::from_rows(table, columns, records, self.partitions);

        info!(
            "Read {} rows from {} in {:.2}s ({} partitions)",
            row_count,
            table,
            start_time.elapsed().as_secs_f64(),
            dataset.partitions.len()
        );
        Ok(dataset)
    }
}
