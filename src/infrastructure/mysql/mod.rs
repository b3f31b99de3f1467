pub mod connection_registry;
pub mod mysql_source_adapter;
pub mod sql_utils;
pub mod value_conversion;
