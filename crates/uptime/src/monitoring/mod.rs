/// Monitoring engine module - probes endpoints and drives the cycle loop
///
/// This module is responsible for:
/// - Executing and classifying HTTP/HTTPS probes
/// - Fanning out one cycle's probes concurrently
/// - Scheduling cycles at a fixed cadence until cancelled
pub mod checker;
pub mod executor;
pub mod scheduler;
pub mod types;

pub use checker::{Checker, HttpChecker, classify};
pub use executor::CycleDispatcher;
pub use scheduler::{CycleOutcome, MonitoringScheduler, STOP_NOTICE, SchedulerState};
pub use types::{ProbeResult, ProbeStatus};
