use std::io::Write;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::executor::CycleDispatcher;
use crate::endpoint::EndpointDescriptor;
use crate::error::MonitorError;
use crate::reporter::Reporter;
use crate::tracker::AvailabilityTracker;

/// Printed once the loop stops on operator request
pub const STOP_NOTICE: &str = "Monitoring stopped manually";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopped,
}

/// Whether a cycle made it to the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed,
    /// Cancelled while probes were in flight, nothing was folded
    Abandoned,
}

/// Time left in the cycle budget, zero when the cycle overran
pub fn remaining_budget(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

/// Monitoring scheduler - drives one cycle per interval until cancelled.
///
/// Owns the endpoint list and the availability table for the whole run.
pub struct MonitoringScheduler<W: Write> {
    endpoints: Vec<EndpointDescriptor>,
    dispatcher: CycleDispatcher,
    tracker: AvailabilityTracker,
    reporter: Reporter<W>,
    interval: Duration,
    state: SchedulerState,
    completed_cycles: u64,
}

impl<W: Write> MonitoringScheduler<W> {
    pub fn new(
        endpoints: Vec<EndpointDescriptor>,
        dispatcher: CycleDispatcher,
        reporter: Reporter<W>,
        interval: Duration,
    ) -> Self {
        Self {
            endpoints,
            dispatcher,
            tracker: AvailabilityTracker::new(),
            reporter,
            interval,
            state: SchedulerState::Running,
            completed_cycles: 0,
        }
    }

    /// Run cycles until `cancel` fires, then emit the stop notice.
    ///
    /// Cancellation is honoured while probes are in flight and during the
    /// sleep between cycles. A cycle is either folded and reported in full
    /// or dropped before the fold.
    pub async fn run(&mut self, cancel: &CancellationToken) -> Result<(), MonitorError> {
        info!(
            endpoints = self.endpoints.len(),
            interval_secs = self.interval.as_secs(),
            "monitoring started"
        );

        while !cancel.is_cancelled() {
            let cycle_start = Instant::now();

            if self.run_cycle(cancel).await? == CycleOutcome::Abandoned {
                break;
            }

            let remaining = remaining_budget(self.interval, cycle_start.elapsed());
            debug!(
                cycle = self.completed_cycles,
                sleep_ms = remaining.as_millis() as u64,
                "cycle reported"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = sleep(remaining) => {}
            }
        }

        self.state = SchedulerState::Stopped;
        info!(cycles = self.completed_cycles, "monitoring stopped");
        self.reporter.notice(STOP_NOTICE)?;

        Ok(())
    }

    /// Probe, fold and report once.
    pub async fn run_cycle(&mut self, cancel: &CancellationToken) -> Result<CycleOutcome, MonitorError> {
        for endpoint in &mut self.endpoints {
            endpoint.normalize_scheme();
        }

        let results = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("cycle abandoned before fold");
                return Ok(CycleOutcome::Abandoned);
            }
            results = self.dispatcher.dispatch(&self.endpoints) => results,
        };

        // No await from here to the report.
        self.tracker.update(&results);
        self.reporter.report(&self.tracker.snapshot())?;
        self.completed_cycles += 1;

        Ok(CycleOutcome::Completed)
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    pub fn tracker(&self) -> &AvailabilityTracker {
        &self.tracker
    }

    pub fn endpoints(&self) -> &[EndpointDescriptor] {
        &self.endpoints
    }

    pub fn into_reporter(self) -> Reporter<W> {
        self.reporter
    }
}
