//! # Scan Scheduler
//!
//! Runs a bounded pool of workers over a [`ScanTarget`]'s port range.
//!
//! Exactly `min(concurrency, port count)` workers are spawned. Each one pulls
//! the next pending port from the shared [`job::ScanJob`], probes it, records
//! the outcome and immediately pulls again, so a slow port never holds back
//! the rest of the pool. At most `concurrency` sockets exist at any instant.
//!
//! Workers run on the multi-threaded tokio runtime, so probes proceed in
//! parallel across threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sweepr_common::config::{Config, MAX_CONCURRENCY};
use sweepr_common::error::ScanError;
use sweepr_common::network::target::ScanTarget;
use sweepr_common::scan::outcome::PortOutcome;
use sweepr_common::scan::report::ScanStatus;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::network::tcp::Prober;

mod job;

use job::{ErrorMonitor, ScanJob};

/// Invoked from worker tasks after every probe, in completion order.
pub type ProgressCallback = Arc<dyn Fn(&PortOutcome) + Send + Sync>;

/// External stop signal for a running scan.
///
/// Cancelling stops workers from pulling new ports. Probes already in flight
/// finish on their own, bounded by the probe timeout, so no socket is torn
/// down mid-connect.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SchedulerOptions {
    pub concurrency: usize,
    pub error_threshold: usize,
}

impl From<&Config> for SchedulerOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            concurrency: cfg.concurrency,
            error_threshold: cfg.error_threshold,
        }
    }
}

/// Raw, unordered result of the scheduler.
#[derive(Debug)]
pub struct ScanRun {
    pub outcomes: Vec<PortOutcome>,
    pub status: ScanStatus,
}

/// Number of workers to spawn for `port_count` ports.
///
/// Zero is rejected. Requests above [`MAX_CONCURRENCY`] are clamped to it.
pub fn effective_concurrency(requested: usize, port_count: usize) -> Result<usize, ScanError> {
    if requested == 0 {
        return Err(ScanError::InvalidConcurrency);
    }
    if requested > MAX_CONCURRENCY {
        warn!("Concurrency {requested} exceeds the ceiling, using {MAX_CONCURRENCY}");
    }
    Ok(requested.min(MAX_CONCURRENCY).min(port_count).max(1))
}

/// Probes every port of `target` and returns one outcome per dispatched port.
///
/// Unless the scan is cancelled or aborted, every port of the range is
/// dispatched. A port whose worker died mid-probe is recorded as an ERROR
/// rather than dropped.
pub async fn scan(
    target: &ScanTarget,
    prober: Arc<dyn Prober>,
    opts: &SchedulerOptions,
    cancel: CancelToken,
    on_outcome: Option<ProgressCallback>,
) -> Result<ScanRun, ScanError> {
    let port_count: usize = target.ports().len();
    let workers: usize = effective_concurrency(opts.concurrency, port_count)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<PortOutcome>();
    let job = Arc::new(ScanJob::new(
        target.addr(),
        target.ports(),
        cancel.clone(),
        ErrorMonitor::new(opts.error_threshold),
        tx,
        on_outcome,
    ));

    info!("Launching {workers} workers to scan {port_count} ports on {}", target.addr());

    let mut pool = JoinSet::new();
    for _ in 0..workers {
        let job = job.clone();
        let prober = prober.clone();
        pool.spawn(async move { job.run_worker(prober.as_ref()).await });
    }

    while let Some(res) = pool.join_next().await {
        if let Err(e) = res {
            error!("Scan worker terminated unexpectedly: {e}");
        }
    }

    let start: u16 = target.ports().start();
    let mut seen = vec![false; port_count];
    let mut outcomes: Vec<PortOutcome> = Vec::with_capacity(port_count);
    while let Ok(outcome) = rx.try_recv() {
        let offset = outcome.port().checked_sub(start).map(usize::from);
        if let Some(slot) = offset.and_then(|offset| seen.get_mut(offset)) {
            *slot = true;
        }
        outcomes.push(outcome);
    }

    for port in job.dispatched() {
        if !seen[usize::from(port - start)] {
            outcomes.push(PortOutcome::error(port, "probe worker terminated unexpectedly"));
        }
    }

    let status = if let Some(reason) = job.abort_reason() {
        ScanStatus::Aborted {
            reason: reason.to_string(),
        }
    } else if outcomes.len() < port_count {
        ScanStatus::Cancelled
    } else {
        ScanStatus::Completed
    };

    Ok(ScanRun { outcomes, status })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
