//! # Result Aggregator
//!
//! Turns the scheduler's unordered outcomes into a deterministic [`ScanReport`]:
//! sorted by port, open ports labelled through the [`ServiceCatalog`], and
//! filtered according to the [`ReportMode`].

use std::time::Duration;

use chrono::{DateTime, Local};
use sweepr_common::config::ReportMode;
use sweepr_common::network::target::ScanTarget;
use sweepr_common::scan::outcome::PortOutcome;
use sweepr_common::scan::report::{ScanReport, ScanStats};
use sweepr_common::services::ServiceCatalog;

use crate::scanner::ScanRun;

pub fn aggregate(
    target: ScanTarget,
    run: ScanRun,
    catalog: &dyn ServiceCatalog,
    mode: ReportMode,
    started_at: DateTime<Local>,
    elapsed: Duration,
) -> ScanReport {
    let ScanRun {
        mut outcomes,
        status,
    } = run;

    outcomes.sort_unstable_by_key(PortOutcome::port);
    let stats = ScanStats::tally(target.ports().len(), &outcomes);

    let entries: Vec<PortOutcome> = outcomes
        .into_iter()
        .filter(|outcome| mode == ReportMode::All || outcome.state().is_open())
        .map(|outcome| label(outcome, catalog))
        .collect();

    ScanReport::new(target, started_at, elapsed, status, mode, entries, stats)
}

fn label(outcome: PortOutcome, catalog: &dyn ServiceCatalog) -> PortOutcome {
    if !outcome.state().is_open() {
        return outcome;
    }
    let service = catalog.label(outcome.port()).to_string();
    outcome.with_service(service)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
