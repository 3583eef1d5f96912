use futures::future::join_all;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::{JoinError, JoinHandle};
use tracing::warn;

use super::checker::Checker;
use super::types::ProbeResult;
use crate::endpoint::EndpointDescriptor;

/// Cycle dispatcher - probes every endpoint of one cycle concurrently
pub struct CycleDispatcher {
    checker: Arc<dyn Checker>,
}

impl CycleDispatcher {
    pub fn new(checker: Arc<dyn Checker>) -> Self {
        Self { checker }
    }

    /// Probe every endpoint at once and wait for all of them.
    ///
    /// Returns exactly one result per endpoint, in input order. A probe task
    /// that panics counts as DOWN for its endpoint; no probe can cancel or
    /// delay the reporting of another.
    pub async fn dispatch(&self, endpoints: &[EndpointDescriptor]) -> Vec<ProbeResult> {
        let handles = endpoints.iter().map(|endpoint| {
            let checker = self.checker.clone();
            let endpoint = endpoint.clone();
            ProbeTask(tokio::spawn(async move { checker.check(&endpoint).await }))
        });

        join_all(handles)
            .await
            .into_iter()
            .zip(endpoints)
            .map(|(joined, endpoint)| {
                joined.unwrap_or_else(|e| {
                    warn!(endpoint = endpoint.label(), error = %e, "probe task failed");
                    ProbeResult::down(endpoint.domain())
                })
            })
            .collect()
    }
}

/// Probe task handle that aborts the probe when dropped.
///
/// Dropping an in-flight dispatch (an abandoned cycle) therefore stops its
/// probes instead of leaving them running detached.
struct ProbeTask(JoinHandle<ProbeResult>);

impl Future for ProbeTask {
    type Output = Result<ProbeResult, JoinError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().0).poll(cx)
    }
}

impl Drop for ProbeTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}
