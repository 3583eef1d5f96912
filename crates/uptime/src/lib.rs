//! Uptime - periodic HTTP availability monitoring for Uppe
//!
//! Probes a fixed list of HTTP endpoints on a steady cadence, classifies
//! every probe as UP or DOWN, and keeps a running availability percentage
//! per domain for as long as the process lives.
//!
//! # Architecture
//!
//! ```text
//! load_endpoints()  ->  Vec<EndpointDescriptor>
//!                             |
//!                   MonitoringScheduler (one cycle every interval)
//!                             |
//!                   CycleDispatcher  --spawn-->  Checker::check() per endpoint
//!                             |
//!                   AvailabilityTracker::update()  (fold)
//!                             |
//!                   Reporter::report()  ->  "<domain> has N% availability percentage"
//! ```

pub mod config;
pub mod endpoint;
pub mod error;
pub mod monitoring;
pub mod reporter;
pub mod tracker;

pub use config::MonitorSettings;
pub use endpoint::{EndpointDescriptor, load_endpoints};
pub use error::{ConfigError, LoadError, MonitorError};
pub use monitoring::{
    Checker, CycleDispatcher, HttpChecker, MonitoringScheduler, ProbeResult, ProbeStatus,
};
pub use reporter::Reporter;
pub use tracker::{AvailabilityTracker, DomainAvailability, DomainStats};

/// Re-export so binaries can hand a token to the scheduler without a direct dependency
pub use tokio_util::sync::CancellationToken;

/// Version string baked into the default user agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
