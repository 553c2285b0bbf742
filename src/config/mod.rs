//! Configuration management
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! TOML file, and `CALLLOG__SECTION__KEY` environment variables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::call_log::CallLogPolicy;
use crate::domain::phone_number::EmergencyNumbers;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub call_log: CallLogConfig,
    pub writer: WriterConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallLogConfig {
    /// Whether calls to emergency numbers are written to the call log
    pub allow_emergency_numbers: bool,
    pub emergency_numbers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub workers: usize,
    /// Maximum batches waiting for a worker; further batches are dropped
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    File,
    Postgres,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// JSON lines file for the `file` store
    pub path: PathBuf,
    pub database_url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set
    pub filter: String,
    /// Print phone numbers in clear text instead of a fingerprint
    pub reveal_pii: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Address for the Prometheus scrape endpoint; disabled when unset
    pub listen: Option<SocketAddr>,
}

impl Default for CallLogConfig {
    fn default() -> Self {
        Self {
            allow_emergency_numbers: false,
            emergency_numbers: EmergencyNumbers::DEFAULT.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            queue_capacity: 256,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Memory,
            path: PathBuf::from("calllog.jsonl"),
            database_url: "postgres://postgres@localhost/calllog".to_string(),
            max_connections: 5,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("database_url", &mask_password(&self.database_url))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Mask the password in a database URL for logging
pub(crate) fn mask_password(url: &str) -> String {
    let authority_start = url.find("://").map(|i| i + 3).unwrap_or(0);
    let authority_end = url[authority_start..]
        .find('/')
        .map(|i| authority_start + i)
        .unwrap_or(url.len());
    let authority = &url[authority_start..authority_end];

    let Some(at_pos) = authority.rfind('@') else {
        return url.to_string();
    };
    let Some(colon_pos) = authority[..at_pos].find(':') else {
        return url.to_string();
    };

    let mut masked = url.to_string();
    masked.replace_range(authority_start + colon_pos + 1..authority_start + at_pos, "****");
    masked
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            reveal_pii: false,
        }
    }
}

impl CallLogConfig {
    pub fn policy(&self) -> CallLogPolicy {
        CallLogPolicy::new(self.allow_emergency_numbers)
    }

    pub fn emergency_numbers(&self) -> EmergencyNumbers {
        EmergencyNumbers::new(&self.emergency_numbers)
    }
}

impl Config {
    /// Load `path` if given, then the environment. Missing keys keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix("CALLLOG")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.writer.workers == 0 {
            return Err(ConfigError::Invalid("writer.workers must be at least 1".to_string()));
        }
        if self.writer.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "writer.queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
