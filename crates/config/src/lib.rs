//! Configuration for the proverd proof-computation worker.
//!
//! Configuration is read from a TOML file; every section and field has a
//! default so a partial (or absent) file still yields a runnable config.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Orchestrator endpoint the session connects to.
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Session tuning.
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging options.
    #[serde(default)]
    pub logging: LogConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub host: String,
    pub port: u16,
}

impl OrchestratorConfig {
    /// The `host:port` address the session dials.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 50081,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Identity string reported in status responses.
    ///
    /// Defaults to `proverd-<pid>` when left empty.
    #[serde(default)]
    pub prover_id: String,

    /// Fixed delay between reconnection attempts.
    #[serde(with = "humantime_serde", default = "default_reconnect_delay")]
    pub reconnect_delay: Duration,

    /// Bound on the number of jobs the registry tracks.
    #[serde(default = "default_max_tracked_jobs")]
    pub max_tracked_jobs: usize,
}

impl SessionConfig {
    /// The configured prover id, or the pid-based default.
    pub fn prover_id(&self) -> String {
        if self.prover_id.is_empty() {
            format!("proverd-{}", std::process::id())
        } else {
            self.prover_id.clone()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prover_id: String::new(),
            reconnect_delay: default_reconnect_delay(),
            max_tracked_jobs: default_max_tracked_jobs(),
        }
    }
}

fn default_reconnect_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_max_tracked_jobs() -> usize {
    1024
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing-subscriber` filter directive, e.g. `info` or `proverd=debug`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file `{path}`: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl Config {
    /// Load the configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_are_runnable() {
        let config = Config::default();

        assert_eq!(config.orchestrator.addr(), "127.0.0.1:50081");
        assert_eq!(config.session.reconnect_delay, Duration::from_secs(5));
        assert_eq!(config.session.max_tracked_jobs, 1024);
        assert!(config.session.prover_id().starts_with("proverd-"));
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn full_file_parses() {
        let toml = r#"
            [orchestrator]
            host = "aggregator.internal"
            port = 50181

            [session]
            prover_id = "prover-eu-1"
            reconnect_delay = "2s 500ms"
            max_tracked_jobs = 64

            [logging]
            filter = "proverd=debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.orchestrator.addr(), "aggregator.internal:50181");
        assert_eq!(config.session.prover_id(), "prover-eu-1");
        assert_eq!(
            config.session.reconnect_delay,
            Duration::from_millis(2500)
        );
        assert_eq!(config.session.max_tracked_jobs, 64);
        assert_eq!(config.logging.filter, "proverd=debug");
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let toml = r#"
            [orchestrator]
            host = "10.0.0.7"
            port = 9000
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.orchestrator.addr(), "10.0.0.7:9000");
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.logging, LogConfig::default());
    }

    #[test]
    fn load_reads_a_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[orchestrator]\nhost = \"h\"\nport = 1").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.orchestrator.addr(), "h:1");
    }

    #[test]
    fn load_of_missing_file_is_an_error() {
        let error = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config {
            orchestrator: OrchestratorConfig {
                host: "orchestrator".to_string(),
                port: 4242,
            },
            session: SessionConfig {
                prover_id: "p1".to_string(),
                reconnect_delay: Duration::from_secs(7),
                max_tracked_jobs: 16,
            },
            logging: LogConfig {
                filter: "debug".to_string(),
            },
        };

        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }
}
