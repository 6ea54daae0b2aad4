//! The in-flight state of one scan, shared by every worker.

use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use sweepr_common::network::range::PortRange;
use sweepr_common::scan::outcome::{PortOutcome, PortState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

use super::{CancelToken, ProgressCallback};
use crate::network::tcp::Prober;

/// Owns the pending-port queue and the outcome sink of a single scan.
///
/// The queue is a cursor over the port range: a worker claims the next port
/// with one `fetch_add`, so no two workers ever take the same port.
pub(crate) struct ScanJob {
    addr: IpAddr,
    ports: PortRange,
    cursor: AtomicUsize,
    cancel: CancelToken,
    monitor: ErrorMonitor,
    outcomes: UnboundedSender<PortOutcome>,
    on_outcome: Option<ProgressCallback>,
}

impl ScanJob {
    pub(crate) fn new(
        addr: IpAddr,
        ports: PortRange,
        cancel: CancelToken,
        monitor: ErrorMonitor,
        outcomes: UnboundedSender<PortOutcome>,
        on_outcome: Option<ProgressCallback>,
    ) -> Self {
        Self {
            addr,
            ports,
            cursor: AtomicUsize::new(0),
            cancel,
            monitor,
            outcomes,
            on_outcome,
        }
    }

    /// Pulls ports and probes them until the queue is drained or the job stops.
    pub(crate) async fn run_worker(&self, prober: &dyn Prober) {
        while let Some(port) = self.next_port() {
            let outcome = prober.probe(self.addr, port).await;
            self.record(outcome);
        }
    }

    fn next_port(&self) -> Option<u16> {
        if self.cancel.is_cancelled() || self.monitor.is_tripped() {
            return None;
        }
        let offset = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.ports.nth(offset)
    }

    fn record(&self, outcome: PortOutcome) {
        if self.monitor.observe(&outcome) {
            error!(
                "Stopping scan of {}: {}",
                self.addr,
                self.monitor.reason().unwrap_or_default()
            );
        }
        if let Some(callback) = &self.on_outcome {
            callback(&outcome);
        }
        if self.outcomes.send(outcome).is_err() {
            debug!("Outcome receiver dropped before the job finished");
        }
    }

    /// Ports handed to a worker so far. Each of them owes exactly one outcome.
    pub(crate) fn dispatched(&self) -> impl Iterator<Item = u16> + '_ {
        let claimed = self.cursor.load(Ordering::Relaxed).min(self.ports.len());
        (0..claimed).filter_map(|offset| self.ports.nth(offset))
    }

    pub(crate) fn abort_reason(&self) -> Option<&str> {
        self.monitor.reason()
    }
}

/// Soft health check: too many ERROR outcomes in a row means the target
/// cannot be reached at all, so the rest of the range is not worth probing.
///
/// Any other outcome resets the streak. Errors caused by this host running
/// out of resources say nothing about the target and are ignored: they
/// neither extend nor reset the streak. A threshold of `0` disables it.
pub(crate) struct ErrorMonitor {
    threshold: usize,
    streak: AtomicUsize,
    tripped: OnceLock<String>,
}

impl ErrorMonitor {
    pub(crate) fn new(threshold: usize) -> Self {
        Self {
            threshold,
            streak: AtomicUsize::new(0),
            tripped: OnceLock::new(),
        }
    }

    /// Returns `true` only for the outcome that trips the monitor.
    pub(crate) fn observe(&self, outcome: &PortOutcome) -> bool {
        if self.threshold == 0 {
            return false;
        }
        match outcome.state() {
            PortState::Error(_) if outcome.is_local_fault() => false,
            PortState::Error(reason) => {
                let streak = self.streak.fetch_add(1, Ordering::Relaxed) + 1;
                if streak < self.threshold {
                    return false;
                }
                let reason = format!("{streak} consecutive probes failed (last error: {reason})");
                self.tripped.set(reason).is_ok()
            }
            _ => {
                self.streak.store(0, Ordering::Relaxed);
                false
            }
        }
    }

    pub(crate) fn is_tripped(&self) -> bool {
        self.tripped.get().is_some()
    }

    pub(crate) fn reason(&self) -> Option<&str> {
        self.tripped.get().map(String::as_str)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
