//! Error types for the uptime monitor.
//!
//! Only startup problems surface as errors. Probe failures never do: they
//! are folded into the availability figures as DOWN results.

use std::io::Error as IoError;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn the endpoint file into descriptors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read endpoint file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("Failed to parse endpoint file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Endpoint #{index} is invalid: {reason}")]
    Invalid { index: usize, reason: String },

    #[error("Endpoint file {} lists no endpoints", .path.display())]
    Empty { path: PathBuf },
}

/// Failure to read the optional monitor settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("Failed to parse settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Neither XDG_CONFIG_HOME nor a home directory is available")]
    ConfigPathUnavailable,
}

/// Failure of the monitoring loop itself
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to write availability report: {0}")]
    Report(#[from] IoError),
}
