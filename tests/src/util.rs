use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::error::ScanError;
use sweepr_common::scan::outcome::PortOutcome;
use sweepr_core::network::tcp::Prober;
use sweepr_core::resolver::AddressResolver;
use tokio::net::TcpListener;

pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Binds `count` loopback listeners on ephemeral ports. Keep them alive for the test.
pub async fn open_listeners(count: usize) -> (Vec<TcpListener>, Vec<u16>) {
    let mut listeners = Vec::with_capacity(count);
    let mut ports = Vec::with_capacity(count);
    for _ in 0..count {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        ports.push(listener.local_addr().unwrap().port());
        listeners.push(listener);
    }
    ports.sort_unstable();
    (listeners, ports)
}

/// A loopback port nothing listens on (bound once, then released).
pub async fn released_port() -> u16 {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Wraps another prober, optionally delaying each probe at random and
/// counting how many probes overlap.
pub struct InstrumentedProber<P> {
    inner: P,
    max_jitter_ms: u64,
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub probes: AtomicUsize,
}

impl<P> InstrumentedProber<P> {
    pub fn new(inner: P, max_jitter_ms: u64) -> Self {
        Self {
            inner,
            max_jitter_ms,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl<P: Prober> Prober for InstrumentedProber<P> {
    async fn probe(&self, addr: IpAddr, port: u16) -> PortOutcome {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.probes.fetch_add(1, Ordering::SeqCst);

        if self.max_jitter_ms > 0 {
            let delay: u64 = rand::random_range(0..=self.max_jitter_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let outcome = self.inner.probe(addr, port).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

/// Resolver that fails for every input, like a name under `.invalid`.
pub struct UnresolvableResolver;

#[async_trait]
impl AddressResolver for UnresolvableResolver {
    async fn resolve(&self, target: &str) -> Result<IpAddr, ScanError> {
        Err(ScanError::Resolution {
            target: target.to_string(),
            reason: "Name or service not known".to_string(),
        })
    }
}
