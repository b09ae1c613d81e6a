//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    /// The endpoint is unauthenticated; restrict it at the network level.
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database.
    Sqlite {
        /// Database file path.
        path: PathBuf,
        /// Seconds a statement waits on a locked database before failing.
        #[serde(default = "default_sqlite_busy_timeout_secs")]
        busy_timeout_secs: Option<u64>,
    },
}

fn default_sqlite_busy_timeout_secs() -> Option<u64> {
    Some(30)
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/data.db"),
            busy_timeout_secs: default_sqlite_busy_timeout_secs(),
        }
    }
}

impl MetadataConfig {
    /// Validate metadata configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            MetadataConfig::Sqlite { path, .. } => {
                if path.as_os_str().is_empty() {
                    return Err("sqlite config requires a non-empty 'path'".to_string());
                }
                Ok(())
            }
        }
    }
}

/// Root identity bootstrap configuration.
///
/// The root user is created on first start with a freshly generated token.
/// Only a digest of the token is stored, so the secret can be handed out
/// exactly once, when it is created: in the log, in `token_file`, or both.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RootConfig {
    /// Log the root token when it is first created (default: true).
    #[serde(default = "default_log_token")]
    pub log_token: bool,
    /// Write a newly created root token to this file (mode 0600 on Unix).
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

fn default_log_token() -> bool {
    true
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            log_token: default_log_token(),
            token_file: None,
        }
    }
}

impl RootConfig {
    /// Validate that a new root token has somewhere to go.
    pub fn validate(&self) -> Result<(), String> {
        if !self.log_token && self.token_file.is_none() {
            return Err("root.log_token = false requires root.token_file".to_string());
        }
        if self
            .token_file
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err("root.token_file cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Default holiday calendar configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Optional TOML file with additional years of holiday tables.
    /// Entries for a year replace the built-in table for that year.
    #[serde(default)]
    pub extra_path: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Root bootstrap configuration.
    #[serde(default)]
    pub root: RootConfig,
    /// Default calendar configuration.
    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Binds to an ephemeral port and keeps the root
    /// token out of the logs; callers receive it from the bootstrap result.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig {
                bind: "127.0.0.1:0".to_string(),
                metrics_enabled: true,
            },
            metadata: MetadataConfig::default(),
            root: RootConfig {
                log_token: false,
                token_file: None,
            },
            calendar: CalendarConfig::default(),
        }
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.metadata.validate()?;
        self.root.validate()?;
        if self.server.bind.trim().is_empty() {
            return Err("server.bind cannot be empty".to_string());
        }
        Ok(())
    }
}
