use thiserror::Error;
use uptime::{ConfigError, LoadError, MonitorError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Endpoints(#[from] LoadError),
    #[error("{0}")]
    Settings(#[from] ConfigError),
    #[error("{0}")]
    Monitor(#[from] MonitorError),
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
