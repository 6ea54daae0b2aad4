use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use sweepr_common::config::Config;
use sweepr_common::scan::report::{ScanReport, ScanStatus};
use sweepr_core::{CancelToken, ScanService};
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, warn};

use crate::commands::CommandLine;
use crate::mprint;
use crate::sink::{FileSink, ReportSink};
use crate::terminal::{format, print, progress};

/// How a scan run ended, as far as the process exit status is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanExit {
    Completed,
    Aborted,
    Cancelled,
    SinkFailed,
}

impl ScanExit {
    pub fn code(self) -> u8 {
        match self {
            ScanExit::Completed => 0,
            ScanExit::Aborted => 3,
            ScanExit::SinkFailed => 4,
            ScanExit::Cancelled => 130,
        }
    }
}

impl From<ScanExit> for ExitCode {
    fn from(exit: ScanExit) -> Self {
        ExitCode::from(exit.code())
    }
}

impl From<&ScanStatus> for ScanExit {
    fn from(status: &ScanStatus) -> Self {
        match status {
            ScanStatus::Completed => ScanExit::Completed,
            ScanStatus::Cancelled => ScanExit::Cancelled,
            ScanStatus::Aborted { .. } => ScanExit::Aborted,
        }
    }
}

/// Resolves the target, scans it and reports the results.
///
/// Resolution and configuration failures are returned as errors before any
/// probe is sent. Everything after that point ends in a report.
pub async fn scan(cli: &CommandLine, cfg: &Config) -> anyhow::Result<ScanExit> {
    cfg.validate()?;

    let service = ScanService::from_config(cfg);
    let target = service
        .resolve(&cli.target, cli.ports)
        .await
        .context("aborting before any port was probed")?;

    let started_at = Local::now();
    print::lines(&format::header_lines(&target, started_at));

    let cancel = CancelToken::new();
    let interrupt = AbortOnDrop(tokio::spawn(cancel_on_interrupt(cancel.clone())));

    let span = progress::scan_span(target.ports().len(), cfg.quiet);
    let tracker = progress::tracker(&span);
    let report: ScanReport = service
        .perform_scan(target, cfg, started_at, cancel, Some(tracker))
        .instrument(span)
        .await?;
    drop(interrupt);

    present(&report, cfg);

    let exit = ScanExit::from(report.status());
    match &cli.output {
        Some(path) => Ok(save_report(&report, &FileSink::new(path), exit)),
        None => Ok(exit),
    }
}

/// Persists the same lines the console showed. A sink failure overrides the
/// scan's own exit status, since the results only survive on screen.
fn save_report(report: &ScanReport, sink: &FileSink, exit: ScanExit) -> ScanExit {
    match sink.persist(&format::report_lines(report)) {
        Ok(()) => {
            info!("Results saved to {}", sink.path().display());
            exit
        }
        Err(e) => {
            error!("{e:#}");
            warn!("The results above were not persisted");
            ScanExit::SinkFailed
        }
    }
}

/// Aborts the wrapped task when dropped, whichever way the scan returns.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn cancel_on_interrupt(cancel: CancelToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        warn!("Interrupted, letting in-flight probes finish...");
        cancel.cancel();
    }
}

fn present(report: &ScanReport, cfg: &Config) {
    mprint!();
    print::header("results", cfg.quiet);
    print::lines(&format::body_lines(report));

    match report.status() {
        ScanStatus::Completed => {}
        ScanStatus::Cancelled => warn!("Scan was interrupted before every port was probed"),
        ScanStatus::Aborted { reason } => error!("Scan aborted: {reason}"),
    }

    if report.stats().open == 0 {
        print::no_results(cfg.quiet);
    }
    print::scan_summary(
        report.status(),
        report.stats().open,
        report.elapsed().as_secs_f64(),
        cfg.quiet,
    );
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::PathBuf;
    use std::time::Duration;
    use sweepr_common::config::ReportMode;
    use sweepr_common::network::range::PortRange;
    use sweepr_common::network::target::ScanTarget;
    use sweepr_common::scan::outcome::PortOutcome;
    use sweepr_common::scan::report::ScanStats;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn loopback_cli(port: u16, output: Option<PathBuf>) -> CommandLine {
        CommandLine {
            target: "127.0.0.1".to_string(),
            ports: PortRange::single(port).unwrap(),
            output,
            concurrency: 10,
            timeout: 500,
            all: false,
            error_threshold: 0,
            quiet: 1,
            verbose: 0,
        }
    }

    fn finished_report() -> ScanReport {
        let entries = vec![PortOutcome::open(22).with_service("ssh")];
        let stats = ScanStats::tally(
            3,
            &[
                PortOutcome::open(22),
                PortOutcome::closed(23),
                PortOutcome::timeout(24),
            ],
        );
        ScanReport::new(
            ScanTarget::new(
                "localhost",
                IpAddr::V4(Ipv4Addr::LOCALHOST),
                PortRange::new(22, 24).unwrap(),
            ),
            Local::now(),
            Duration::from_millis(1200),
            ScanStatus::Completed,
            ReportMode::OpenOnly,
            entries,
            stats,
        )
    }

    #[test]
    fn exit_follows_scan_status() {
        assert_eq!(ScanExit::from(&ScanStatus::Completed), ScanExit::Completed);
        assert_eq!(ScanExit::from(&ScanStatus::Cancelled), ScanExit::Cancelled);
        assert_eq!(
            ScanExit::from(&ScanStatus::Aborted {
                reason: "x".to_string()
            }),
            ScanExit::Aborted
        );
    }

    #[test]
    fn exit_codes_are_distinct() {
        let codes: Vec<u8> = [
            ScanExit::Completed,
            ScanExit::Aborted,
            ScanExit::Cancelled,
            ScanExit::SinkFailed,
        ]
        .into_iter()
        .map(ScanExit::code)
        .collect();
        assert_eq!(codes, vec![0, 3, 130, 4]);
    }

    #[tokio::test]
    async fn scan_fails_on_unresolvable_target_without_probing() {
        let cli = CommandLine {
            target: "doesnotexist.invalid".to_string(),
            ports: "1-1024".parse().unwrap(),
            output: None,
            concurrency: 100,
            timeout: 100,
            all: false,
            error_threshold: 0,
            quiet: 1,
            verbose: 0,
        };
        let err = scan(&cli, &cli.to_config()).await.unwrap_err();
        assert!(format!("{err:#}").contains("doesnotexist.invalid"));
    }

    #[test]
    fn save_report_writes_exactly_the_console_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let report = finished_report();

        let exit = save_report(&report, &FileSink::new(&path), ScanExit::Completed);
        assert_eq!(exit, ScanExit::Completed);

        let written = fs::read_to_string(&path).unwrap();
        let expected = format::report_lines(&report);
        assert_eq!(written.lines().collect::<Vec<_>>(), expected);
        assert!(written.ends_with('\n'));
    }

    #[test]
    fn save_report_failure_overrides_scan_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.txt");

        let exit = save_report(&finished_report(), &FileSink::new(&path), ScanExit::Aborted);
        assert_eq!(exit, ScanExit::SinkFailed);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn scan_reports_sink_failure_once_results_are_shown() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let dir = tempfile::tempdir().unwrap();
        let cli = loopback_cli(port, Some(dir.path().join("missing").join("report.txt")));

        let exit = scan(&cli, &cli.to_config()).await.unwrap();
        assert_eq!(exit, ScanExit::SinkFailed);
        assert_eq!(exit.code(), 4);
    }

    #[tokio::test]
    async fn scan_saves_open_port_to_output_file() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let cli = loopback_cli(port, Some(path.clone()));

        let exit = scan(&cli, &cli.to_config()).await.unwrap();
        assert_eq!(exit, ScanExit::Completed);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Target: 127.0.0.1 (127.0.0.1)"));
        assert!(written.contains(&format!("Port {port:<5} : OPEN")));
        assert!(written.contains("1 open / 1 scanned"));
    }

    #[tokio::test]
    async fn abort_on_drop_stops_the_task() {
        let (tx, rx) = oneshot::channel::<()>();
        let guard = AbortOnDrop(tokio::spawn(async move {
            let _tx = tx;
            std::future::pending::<()>().await;
        }));

        drop(guard);
        // The sender is dropped with the aborted task, never used.
        assert!(rx.await.is_err());
    }
}
