//! # Scan Report
//!
//! The immutable product of a scan, handed to whatever renders or persists it.

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::config::ReportMode;
use crate::network::target::ScanTarget;
use crate::scan::outcome::{PortOutcome, PortState};

/// How the scan ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanStatus {
    /// Every requested port produced an outcome.
    #[default]
    Completed,
    /// The user interrupted the scan; outcomes are partial.
    Cancelled,
    /// The target looked unreachable and dispatching stopped early.
    Aborted { reason: String },
}

impl ScanStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, ScanStatus::Completed)
    }
}

/// Per-state counts over every outcome, including those filtered out of the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub requested: usize,
    pub scanned: usize,
    pub open: usize,
    pub closed: usize,
    pub timeout: usize,
    pub error: usize,
}

impl ScanStats {
    pub fn tally<'a, I>(requested: usize, outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a PortOutcome>,
    {
        let mut stats = Self {
            requested,
            ..Self::default()
        };
        for outcome in outcomes {
            stats.scanned += 1;
            match outcome.state() {
                PortState::Open => stats.open += 1,
                PortState::Closed => stats.closed += 1,
                PortState::Timeout => stats.timeout += 1,
                PortState::Error(_) => stats.error += 1,
            }
        }
        stats
    }
}

#[derive(Debug, Clone)]
pub struct ScanReport {
    target: ScanTarget,
    started_at: DateTime<Local>,
    elapsed: Duration,
    status: ScanStatus,
    mode: ReportMode,
    entries: Vec<PortOutcome>,
    stats: ScanStats,
}

impl ScanReport {
    /// `entries` must already be sorted and filtered according to `mode`.
    pub fn new(
        target: ScanTarget,
        started_at: DateTime<Local>,
        elapsed: Duration,
        status: ScanStatus,
        mode: ReportMode,
        entries: Vec<PortOutcome>,
        stats: ScanStats,
    ) -> Self {
        Self {
            target,
            started_at,
            elapsed,
            status,
            mode,
            entries,
            stats,
        }
    }

    pub fn target(&self) -> &ScanTarget {
        &self.target
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn status(&self) -> &ScanStatus {
        &self.status
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    /// Listed outcomes in ascending port order.
    pub fn entries(&self) -> &[PortOutcome] {
        &self.entries
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn open_ports(&self) -> impl Iterator<Item = &PortOutcome> {
        self.entries.iter().filter(|o| o.state().is_open())
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
