//! Plain-text rendering of a scan report.
//!
//! The console and the output file receive exactly these lines, so nothing
//! here carries colour codes.

use std::time::Duration;

use chrono::{DateTime, Local};
use sweepr_common::network::target::ScanTarget;
use sweepr_common::scan::outcome::{PortOutcome, PortState};
use sweepr_common::scan::report::{ScanReport, ScanStats, ScanStatus};

pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";
const RULE_WIDTH: usize = 50;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

pub fn header_lines(target: &ScanTarget, started_at: DateTime<Local>) -> Vec<String> {
    vec![
        rule(),
        format!("Target: {} ({})", target.input(), target.addr()),
        format!("Started at: {}", started_at.format(TIMESTAMP_FORMAT)),
        format!(
            "Ports: {} ({} total)",
            target.ports(),
            target.ports().len()
        ),
        rule(),
    ]
}

pub fn outcome_line(outcome: &PortOutcome) -> String {
    let port = outcome.port();
    match (outcome.state(), outcome.service()) {
        (PortState::Error(reason), _) => format!("Port {port:<5} : ERROR ({reason})"),
        (state, Some(service)) => format!("Port {port:<5} : {state} ({service})"),
        (state, None) => format!("Port {port:<5} : {state}"),
    }
}

pub fn summary_line(stats: &ScanStats, elapsed: Duration) -> String {
    format!(
        "{} open / {} scanned ({} closed, {} timeout, {} error) in {:.2}s",
        stats.open,
        stats.scanned,
        stats.closed,
        stats.timeout,
        stats.error,
        elapsed.as_secs_f64()
    )
}

/// One-word outcome of the run, used by the closing banner.
pub fn verdict(status: &ScanStatus) -> &'static str {
    match status {
        ScanStatus::Completed => "Scan Complete",
        ScanStatus::Cancelled => "Scan Interrupted",
        ScanStatus::Aborted { .. } => "Scan Aborted",
    }
}

fn status_line(status: &ScanStatus, stats: &ScanStats) -> Option<String> {
    match status {
        ScanStatus::Completed => None,
        ScanStatus::Cancelled => Some(format!(
            "Scan interrupted: {} of {} ports probed, results are partial",
            stats.scanned, stats.requested
        )),
        ScanStatus::Aborted { reason } => Some(format!(
            "Scan aborted, target looks unreachable: {reason}"
        )),
    }
}

/// Everything after the header: status, per-port lines, summary.
pub fn body_lines(report: &ScanReport) -> Vec<String> {
    let mut lines: Vec<String> = Vec::with_capacity(report.entries().len() + 3);

    if let Some(status) = status_line(report.status(), report.stats()) {
        lines.push(status);
    }

    if report.stats().open == 0 {
        lines.push("No open ports found.".to_string());
    }
    lines.extend(report.entries().iter().map(outcome_line));

    lines.push(summary_line(report.stats(), report.elapsed()));
    lines
}

/// The whole report, as persisted by a sink.
pub fn report_lines(report: &ScanReport) -> Vec<String> {
    let mut lines = header_lines(report.target(), report.started_at());
    lines.extend(body_lines(report));
    lines
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
