use std::collections::BTreeSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use sweepr_common::config::{Config, ReportMode};
use sweepr_common::error::{RangeError, ScanError};
use sweepr_common::network::range::PortRange;
use sweepr_common::scan::outcome::{PortOutcome, PortState};
use sweepr_common::scan::report::ScanReport;
use sweepr_common::services::WellKnownServices;
use sweepr_core::network::tcp::TcpProber;
use sweepr_core::resolver::SystemResolver;
use sweepr_core::{CancelToken, ScanService};

use crate::util::{self, InstrumentedProber, UnresolvableResolver};

const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

fn loopback_config(concurrency: usize, report_mode: ReportMode) -> Config {
    Config {
        concurrency,
        timeout: PROBE_TIMEOUT,
        report_mode,
        ..Config::default()
    }
}

async fn scan_loopback(
    service: &ScanService,
    ports: PortRange,
    cfg: &Config,
) -> anyhow::Result<ScanReport> {
    let target = service.resolve("127.0.0.1", ports).await?;
    let report = service
        .perform_scan(target, cfg, chrono::Local::now(), CancelToken::new(), None)
        .await?;
    Ok(report)
}

fn open_set(report: &ScanReport) -> BTreeSet<u16> {
    report.open_ports().map(PortOutcome::port).collect()
}

/// Listening loopback ports are reported OPEN, twice in a row.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn loopback_listeners_are_found_open_repeatably() {
    let (_listeners, ports) = util::open_listeners(3).await;
    let range = PortRange::new(ports[0], ports[2]).unwrap();
    let cfg = loopback_config(256, ReportMode::OpenOnly);
    let service = ScanService::from_config(&cfg);

    let first = scan_loopback(&service, range, &cfg).await.unwrap();
    let second = scan_loopback(&service, range, &cfg).await.unwrap();

    let expected: BTreeSet<u16> = ports.iter().copied().collect();
    assert!(
        expected.is_subset(&open_set(&first)),
        "listeners {expected:?} missing from {:?}",
        open_set(&first)
    );
    assert_eq!(open_set(&first), open_set(&second));
    assert!(first.status().is_completed());
    assert_eq!(first.stats().scanned, range.len());
    assert!(first.entries().iter().all(|o| o.service().is_some()));
}

#[tokio::test]
async fn released_port_is_reported_closed_in_full_listing() {
    let port = util::released_port().await;
    let cfg = loopback_config(4, ReportMode::All);
    let service = ScanService::from_config(&cfg);

    let report = scan_loopback(&service, PortRange::single(port).unwrap(), &cfg)
        .await
        .unwrap();

    assert_eq!(report.entries().len(), 1);
    assert_eq!(report.entries()[0].state(), &PortState::Closed);
    assert_eq!(report.entries()[0].service(), None);
    assert_eq!(report.stats().closed, 1);
}

/// Every requested port shows up exactly once, in ascending order, even
/// though probes complete in random order.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn full_listing_covers_range_in_order_despite_jitter() {
    let (_listeners, ports) = util::open_listeners(1).await;
    let start = ports[0].saturating_sub(150).max(1);
    let range = PortRange::new(start, ports[0]).unwrap();

    let prober = Arc::new(InstrumentedProber::new(TcpProber::new(PROBE_TIMEOUT), 5));
    let service = ScanService::new(
        Box::new(SystemResolver),
        prober.clone(),
        Box::new(WellKnownServices),
    );
    let cfg = loopback_config(16, ReportMode::All);

    let report = scan_loopback(&service, range, &cfg).await.unwrap();

    let listed: Vec<u16> = report.entries().iter().map(PortOutcome::port).collect();
    assert_eq!(listed, range.iter().collect::<Vec<u16>>());
    assert_eq!(prober.probes.load(Ordering::SeqCst), range.len());
    assert!(report.open_ports().any(|o| o.port() == ports[0]));
}

/// No more than `concurrency` sockets exist at once, none after the scan.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn socket_usage_stays_within_concurrency_limit() {
    let prober = Arc::new(InstrumentedProber::new(TcpProber::new(PROBE_TIMEOUT), 1));
    let service = ScanService::new(
        Box::new(SystemResolver),
        prober.clone(),
        Box::new(WellKnownServices),
    );
    let cfg = loopback_config(25, ReportMode::OpenOnly);

    let report = scan_loopback(&service, PortRange::new(40000, 40999).unwrap(), &cfg)
        .await
        .unwrap();

    let peak = prober.peak.load(Ordering::SeqCst);
    assert!(peak <= 25, "{peak} sockets were open at once");
    assert_eq!(prober.in_flight.load(Ordering::SeqCst), 0);
    assert_eq!(report.stats().scanned, 1000);
}

#[tokio::test]
async fn unresolvable_target_dispatches_no_probe() {
    let prober = Arc::new(InstrumentedProber::new(TcpProber::new(PROBE_TIMEOUT), 0));
    let service = ScanService::new(
        Box::new(UnresolvableResolver),
        prober.clone(),
        Box::new(WellKnownServices),
    );

    let err = service
        .resolve("doesnotexist.invalid", PortRange::new(1, 1024).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::Resolution { .. }));
    assert!(err.to_string().contains("doesnotexist.invalid"));
    assert_eq!(prober.probes.load(Ordering::SeqCst), 0);
}

#[test]
fn inverted_range_is_rejected_before_scheduling() {
    assert_eq!(
        "500-100".parse::<PortRange>(),
        Err(RangeError::Inverted { start: 500, end: 100 })
    );
    assert!(PortRange::new(500, 100).is_err());
}

#[tokio::test]
async fn cancelled_scan_returns_sorted_partial_results() {
    let cfg = loopback_config(2, ReportMode::All);
    let prober = Arc::new(InstrumentedProber::new(TcpProber::new(PROBE_TIMEOUT), 2));
    let service = ScanService::new(
        Box::new(SystemResolver),
        prober.clone(),
        Box::new(WellKnownServices),
    );
    let target = service
        .resolve("127.0.0.1", PortRange::new(20000, 29999).unwrap())
        .await
        .unwrap();

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let report = service
        .perform_scan(target, &cfg, chrono::Local::now(), cancel, None)
        .await
        .unwrap();
    canceller.await.unwrap();

    assert!(!report.status().is_completed());
    assert!(report.stats().scanned < 10_000);
    assert_eq!(report.stats().scanned, prober.probes.load(Ordering::SeqCst));
    assert!(report.entries().windows(2).all(|w| w[0].port() < w[1].port()));
}
