pub mod kinesis_publish_adapter;
