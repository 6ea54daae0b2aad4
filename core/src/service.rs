//! # Port Scan Service
//!
//! Implements the core "scan a host" use case.
//!
//! This service sequences the collaborators of a scan: it resolves the target,
//! hands the resolved address to the scheduler and aggregates what comes back.

use std::sync::Arc;

use chrono::{DateTime, Local};
use sweepr_common::config::Config;
use sweepr_common::error::ScanError;
use sweepr_common::network::range::PortRange;
use sweepr_common::network::target::ScanTarget;
use sweepr_common::scan::report::ScanReport;
use sweepr_common::services::{ServiceCatalog, WellKnownServices};
use tokio::time::Instant;

use crate::aggregator;
use crate::network::tcp::{Prober, TcpProber};
use crate::resolver::{AddressResolver, SystemResolver};
use crate::scanner::{self, CancelToken, ProgressCallback, SchedulerOptions};

/// Application service for port scanning.
///
/// Orchestrates a scan by:
/// 1. delegating name resolution to the [`AddressResolver`].
/// 2. delegating the probing to the scheduler and its [`Prober`].
/// 3. labelling and ordering results with the [`ServiceCatalog`].
pub struct ScanService {
    resolver: Box<dyn AddressResolver>,
    prober: Arc<dyn Prober>,
    catalog: Box<dyn ServiceCatalog>,
}

impl ScanService {
    pub fn new(
        resolver: Box<dyn AddressResolver>,
        prober: Arc<dyn Prober>,
        catalog: Box<dyn ServiceCatalog>,
    ) -> Self {
        Self {
            resolver,
            prober,
            catalog,
        }
    }

    /// System resolver, TCP connect probes with `cfg.timeout`, built-in service names.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            Box::new(SystemResolver),
            Arc::new(TcpProber::new(cfg.timeout)),
            Box::new(WellKnownServices),
        )
    }

    /// Resolves `input` and pairs it with `ports`. No probe is sent here.
    pub async fn resolve(&self, input: &str, ports: PortRange) -> Result<ScanTarget, ScanError> {
        let addr = self.resolver.resolve(input).await?;
        Ok(ScanTarget::new(input.trim(), addr, ports))
    }

    /// Scans `target` and returns its ordered report.
    ///
    /// `started_at` is the wall-clock time stamped on the report.
    pub async fn perform_scan(
        &self,
        target: ScanTarget,
        cfg: &Config,
        started_at: DateTime<Local>,
        cancel: CancelToken,
        on_outcome: Option<ProgressCallback>,
    ) -> Result<ScanReport, ScanError> {
        cfg.validate()?;

        let clock = Instant::now();
        let opts = SchedulerOptions::from(cfg);
        let run = scanner::scan(&target, self.prober.clone(), &opts, cancel, on_outcome).await?;

        Ok(aggregator::aggregate(
            target,
            run,
            self.catalog.as_ref(),
            cfg.report_mode,
            started_at,
            clock.elapsed(),
        ))
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
