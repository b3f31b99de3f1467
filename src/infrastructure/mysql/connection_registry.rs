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

use crate::config::ConnectionConfig;
use crate::domain::errors::{JobError, Result};
use mysql_async::{Opts, OptsBuilder};
use secrecy::ExposeSecret;
use std::collections::HashMap;

/// Environment variable consulted when a connection has no password in the settings file.
pub const PASSWORD_ENV: &str = "SOURCE_PASSWORD";

/// Named source connections, resolved to driver options on demand.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<String, ConnectionConfig>,
}

impl ConnectionRegistry {
    pub fn new(connections: HashMap<String, ConnectionConfig>) -> Self {
        Self { connections }
    }

    /// Builds driver options for the named connection.
    ///
    /// Credentials in the settings file win over those embedded in the URL.
    /// A missing password falls back to `SOURCE_PASSWORD`.
    pub fn resolve(&self, name: &str) -> Result<Opts> {
        let conn = self.connections.get(name).ok_or_else(|| {
            JobError::ConnectionError(format!("unknown source connection '{}'", name))
        })?;

        let base = Opts::from_url(&conn.url).map_err(|e| {
            JobError::ConnectionError(format!("invalid url for connection '{}': {}", name, e))
        })?;

        let password = conn
            .password
            .as_ref()
            .map(|p| p.expose_secret().to_string())
            .or_else(|| std::env::var(PASSWORD_ENV).ok());

        let mut builder = OptsBuilder::from_opts(base);
        if let Some(user) = &conn.username {
            builder = builder.user(Some(user.clone()));
        }
        if let Some(pass) = password {
            builder = builder.pass(Some(pass));
        }

        Ok(Opts::from(builder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn registry() -> ConnectionRegistry {
        let mut map = HashMap::new();
        map.insert(
            "sales-db".to_string(),
            ConnectionConfig {
                url: "mysql://localhost:3306/sales".to_string(),
                username: Some("dbadmin".to_string()),
                password: Some(SecretString::from("secret".to_string())),
            },
        );
        map.insert(
            "broken".to_string(),
            ConnectionConfig {
                url: "not a url".to_string(),
                username: None,
                password: None,
            },
        );
        ConnectionRegistry::new(map)
    }

    #[test]
    fn test_resolve_known_connection() {
        let opts = registry().resolve("sales-db").unwrap();
        assert_eq!(opts.ip_or_hostname(), "localhost");
        assert_eq!(opts.tcp_port(), 3306);
        assert_eq!(opts.db_name(), Some("sales"));
        assert_eq!(opts.user(), Some("dbadmin"));
        assert_eq!(opts.pass(), Some("secret"));
    }

    #[test]
    fn test_unknown_connection_is_an_error() {
        match registry().resolve("nope") {
            Err(JobError::ConnectionError(msg)) => assert!(msg.contains("nope")),
            other => panic!("expected connection error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        assert!(matches!(
            registry().resolve("broken"),
            Err(JobError::ConnectionError(_))
        ));
    }
}
