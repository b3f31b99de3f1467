//! Infrastructure adapter that publishes record batches to Amazon Kinesis.

use crate::config::DestinationConfig;
use crate::domain::entities::{PublishOutcome, TransportRecord};
use crate::domain::errors::{JobError, Result};
use crate::ports::publish_port::PublishPort;
use aws_config::BehaviorVersion;
use aws_sdk_kinesis::error::DisplayErrorContext;
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::types::PutRecordsRequestEntry;
use aws_sdk_kinesis::Client as KinesisClient;
use log::{debug, warn};
use tokio::runtime::Handle;

/// Concrete implementation of `PublishPort` backed by `PutRecords`.
///
/// One client is built at startup and shared by every partition worker.
/// The client is immutable and pools its own connections.
pub struct KinesisPublishAdapter {
    client: KinesisClient,
    handle: Handle,
}

impl KinesisPublishAdapter {
    /// Builds the client from the default AWS credential chain.
    pub fn connect(handle: Handle, destination: &DestinationConfig) -> Self {
        let client = handle.block_on(Self::create_client(destination));
        Self { client, handle }
    }

    async fn create_client(destination: &DestinationConfig) -> KinesisClient {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &destination.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_kinesis::config::Builder::from(&sdk_config);
        // Custom endpoint for Kinesis-compatible services (LocalStack, etc.)
        if let Some(endpoint) = &destination.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }
        KinesisClient::from_conf(builder.build())
    }
}

/// Converts transport records into request entries, preserving order.
pub fn to_entries(stream: &str, records: Vec<TransportRecord>) -> Result<Vec<PutRecordsRequestEntry>> {
    records
        .into_iter()
        .map(|r| {
            PutRecordsRequestEntry::builder()
                .data(Blob::new(r.payload))
                .partition_key(r.partition_key)
                .build()
                .map_err(|e| JobError::PublishError {
                    stream: stream.to_string(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

impl PublishPort for KinesisPublishAdapter {
    fn put_records(&self, stream: &str, records: Vec<TransportRecord>) -> Result<PublishOutcome> {
        let count = records.len();
        let entries = to_entries(stream, records)?;

        let output = self
            .handle
            .block_on(
                self.client
                    .put_records()
                    .stream_name(stream)
                    .set_records(Some(entries))
                    .send(),
            )
            .map_err(|e| JobError::PublishError {
                stream: stream.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        let failed_records = output.failed_record_count().unwrap_or(0).max(0) as u64;
        if failed_records > 0 {
            warn!(
                "{} of {} records were rejected by stream {}",
                failed_records, count, stream
            );
        } else {
            debug!("Published {} records to {}", count, stream);
        }

        Ok(PublishOutcome { failed_records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_entries_keeps_payload_and_key() {
        let records = vec![
            TransportRecord {
                payload: r#"{"id":1,"name":"A"}"#.to_string(),
                partition_key: "a".repeat(64),
            },
            TransportRecord {
                payload: r#"{"id":2,"name":"B"}"#.to_string(),
                partition_key: "b".repeat(64),
            },
        ];

        let entries = to_entries("stream", records).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].data().as_ref(), br#"{"id":1,"name":"A"}"#);
        assert_eq!(entries[0].partition_key(), "a".repeat(64));
        assert_eq!(entries[1].partition_key(), "b".repeat(64));
    }

    #[test]
    fn test_to_entries_empty_batch() {
        assert!(to_entries("stream", vec![]).unwrap().is_empty());
    }
}
