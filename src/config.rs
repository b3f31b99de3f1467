//! Job configuration.
//!
//! The four job parameters come from the command line and are required.
//! Connection details and optional tuning live in a YAML or JSON settings
//! file; command line flags override the file.

use crate::domain::errors::{JobError, Result};
use clap::Parser;
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::Read;

/// Number of rows previewed in the log when no `--show-rows` is given.
pub const DEFAULT_SHOW_ROWS: usize = 20;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Job identifier
    #[arg(long = "JOB_NAME")]
    pub job_name: Option<String>,

    /// Name of a connection defined in the settings file
    #[arg(long = "source_connection")]
    pub source_connection: Option<String>,

    /// Source table, optionally qualified as `schema.table`
    #[arg(long = "table_name")]
    pub table_name: Option<String>,

    /// Destination Kinesis stream name
    #[arg(long = "kinesis_stream")]
    pub kinesis_stream: Option<String>,

    /// Path to settings file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    // Overrides for ad-hoc runs
    #[arg(long)]
    pub partitions: Option<usize>,
    #[arg(long)]
    pub parallel: Option<usize>,
    #[arg(long)]
    pub cpu_percent: Option<u8>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub endpoint_url: Option<String>,
    #[arg(long)]
    pub report_dir: Option<String>,
    #[arg(long)]
    pub show_rows: Option<usize>,
}

/// Settings file layout.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
    #[serde(default)]
    pub destination: DestinationConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    pub report_dir: Option<String>,
}

/// A named source connection.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConnectionConfig {
    /// `mysql://host:port/database`
    pub url: String,
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DestinationConfig {
    pub region: Option<String>,
    /// Custom endpoint, e.g. LocalStack.
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExecutionConfig {
    /// Number of partitions the snapshot is split into.
    pub partitions: Option<usize>,
    /// Worker threads. Takes precedence over `cpu_percent`.
    pub parallel: Option<usize>,
    pub cpu_percent: Option<u8>,
}

/// Fully resolved job configuration. Built once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub job_name: String,
    pub source_connection: String,
    pub table_name: String,
    pub kinesis_stream: String,
    pub connections: HashMap<String, ConnectionConfig>,
    pub destination: DestinationConfig,
    pub execution: ExecutionConfig,
    pub report_dir: Option<String>,
    pub show_rows: usize,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: AppConfig = if path.ends_with(".json") {
            serde_json::from_str(&contents)
                .map_err(|e| JobError::ConfigError(format!("{}: {}", path, e)))?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| JobError::ConfigError(format!("{}: {}", path, e)))?
        };

        Ok(config)
    }

    pub fn merge_cli(&mut self, args: &CliArgs) {
        if let Some(p) = args.partitions { self.execution.partitions = Some(p); }
        if let Some(p) = args.parallel { self.execution.parallel = Some(p); }
        if let Some(c) = args.cpu_percent { self.execution.cpu_percent = Some(c); }
        if let Some(r) = &args.region { self.destination.region = Some(r.clone()); }
        if let Some(e) = &args.endpoint_url { self.destination.endpoint_url = Some(e.clone()); }
        if let Some(d) = &args.report_dir { self.report_dir = Some(d.clone()); }
    }
}

/// Resolves the job configuration from a command line.
///
/// Every job parameter is required; there is no partial-configuration mode.
/// `--help` and `--version` come back as `JobError::CliError`.
pub fn resolve_configuration<I, T>(argv: I) -> Result<JobConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = CliArgs::try_parse_from(argv)?;
    let required = [
        ("JOB_NAME", &args.job_name),
        ("source_connection", &args.source_connection),
        ("table_name", &args.table_name),
        ("kinesis_stream", &args.kinesis_stream),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, v)| v.as_deref().map_or(true, |s| s.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(JobError::ConfigError(format!(
            "missing required parameter(s): {}",
            missing.join(", ")
        )));
    }

    let mut settings = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    settings.merge_cli(&args);

    if let Some(c) = settings.execution.cpu_percent {
        if c == 0 || c > 100 {
            return Err(JobError::ConfigError(format!(
                "cpu_percent must be between 1 and 100, got {}",
                c
            )));
        }
    }

    Ok(JobConfig {
        job_name: args.job_name.unwrap_or_default(),
        source_connection: args.source_connection.unwrap_or_default(),
        table_name: args.table_name.unwrap_or_default(),
        kinesis_stream: args.kinesis_stream.unwrap_or_default(),
        connections: settings.connections,
        destination: settings.destination,
        execution: settings.execution,
        report_dir: settings.report_dir,
        show_rows: args.show_rows.unwrap_or(DEFAULT_SHOW_ROWS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    fn resolve(extra: &[&str]) -> Result<JobConfig> {
        let mut argv = vec!["table-stream-publisher"];
        argv.extend_from_slice(extra);
        resolve_configuration(argv)
    }

    const FULL: [&str; 8] = [
        "--JOB_NAME",
        "customer-export",
        "--source_connection",
        "sales-db",
        "--table_name",
        "customer",
        "--kinesis_stream",
        "customer-stream",
    ];

    #[test]
    fn test_resolve_all_required_parameters() {
        let config = resolve(&FULL).unwrap();
        assert_eq!(config.job_name, "customer-export");
        assert_eq!(config.source_connection, "sales-db");
        assert_eq!(config.table_name, "customer");
        assert_eq!(config.kinesis_stream, "customer-stream");
        assert_eq!(config.show_rows, DEFAULT_SHOW_ROWS);
        assert!(config.connections.is_empty());
    }

    #[test]
    fn test_missing_parameter_is_fatal() {
        match resolve(&FULL[..6]) {
            Err(JobError::ConfigError(msg)) => assert!(msg.contains("kinesis_stream")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_all_missing_parameters_are_reported() {
        match resolve(&[]) {
            Err(JobError::ConfigError(msg)) => {
                for name in ["JOB_NAME", "source_connection", "table_name", "kinesis_stream"] {
                    assert!(msg.contains(name), "{} not in {}", name, msg);
                }
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_parameter_counts_as_missing() {
        let mut argv = FULL.to_vec();
        argv[5] = "  ";
        assert!(matches!(
            resolve(&argv),
            Err(JobError::ConfigError(_))
        ));
    }

    #[test]
    fn test_load_yaml_config_and_cli_override() {
        let yaml = r#"
connections:
  sales-db:
    url: "mysql://localhost:3306/sales"
    username: "dbadmin"
    password: "secret"
destination:
  region: "eu-west-1"
execution:
  partitions: 4
  cpu_percent: 75
report_dir: "./reports"
"#;
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "{}", yaml).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let mut argv = FULL.to_vec();
        argv.extend_from_slice(&["--config", path.as_str(), "--partitions", "8", "--show-rows", "5"]);
        let config = resolve(&argv).unwrap();

        let conn = &config.connections["sales-db"];
        assert_eq!(conn.url, "mysql://localhost:3306/sales");
        assert_eq!(conn.username.as_deref(), Some("dbadmin"));
        assert_eq!(config.destination.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.execution.partitions, Some(8));
        assert_eq!(config.execution.cpu_percent, Some(75));
        assert_eq!(config.report_dir.as_deref(), Some("./reports"));
        assert_eq!(config.show_rows, 5);
    }

    #[test]
    fn test_load_json_config() {
        let json = r#"{"connections": {"db": {"url": "mysql://h/db"}}}"#;
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{}", json).unwrap();

        let config = AppConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.connections["db"].url, "mysql://h/db");
        assert!(config.connections["db"].password.is_none());
        assert!(config.destination.endpoint_url.is_none());
    }

    #[test]
    fn test_invalid_cpu_percent_rejected() {
        let mut argv = FULL.to_vec();
        argv.extend_from_slice(&["--cpu-percent", "0"]);
        assert!(matches!(
            resolve(&argv),
            Err(JobError::ConfigError(_))
        ));
    }

    #[test]
    fn test_password_is_redacted_in_debug() {
        let conn = ConnectionConfig {
            url: "mysql://h/db".into(),
            username: Some("u".into()),
            password: Some(SecretString::from("hunter2".to_string())),
        };
        let dbg = format!("{:?}", conn);
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("REDACTED"));
    }

    #[test]
    fn test_password_from_settings_file_is_kept_secret() {
        let yaml = "connections:\n  db:\n    url: \"mysql://h/db\"\n    password: \"hunter2\"\n";
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "{}", yaml).unwrap();

        let config = AppConfig::from_file(file.path().to_str().unwrap()).unwrap();
        let password = config.connections["db"].password.as_ref().unwrap();
        assert_eq!(password.expose_secret(), "hunter2");
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn test_help_is_returned_as_cli_error() {
        match resolve(&["--help"]) {
            Err(JobError::CliError(e)) => {
                assert_eq!(e.kind(), clap::error::ErrorKind::DisplayHelp)
            }
            other => panic!("expected help output, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_flag_is_cli_error() {
        let mut argv = FULL.to_vec();
        argv.push("--bogus");
        assert!(matches!(resolve(&argv), Err(JobError::CliError(_))));
    }
}
