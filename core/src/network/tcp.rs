//! # Connection Probe
//!
//! One TCP connect attempt against one port, classified into a [`PortOutcome`].
//!
//! The socket lives inside the connect future and the returned stream, so it is
//! closed on every path: dropped right after a successful handshake, dropped
//! with the future when the timeout fires, and released by the OS on failure.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::scan::outcome::PortOutcome;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Defines the strategy for probing a single transport-layer port.
///
/// Implementations are total: every failure is folded into the returned outcome.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: IpAddr, port: u16) -> PortOutcome;
}

/// Full TCP handshake prober (`connect()` scan). Needs no privileges.
#[derive(Debug, Clone, Copy)]
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: IpAddr, port: u16) -> PortOutcome {
        handshake_probe(addr, port, self.timeout).await
    }
}

pub async fn handshake_probe(addr: IpAddr, port: u16, probe_timeout: Duration) -> PortOutcome {
    let socket_addr: SocketAddr = SocketAddr::new(addr, port);

    let outcome = match timeout(probe_timeout, TcpStream::connect(socket_addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            PortOutcome::open(port)
        }
        Ok(Err(err)) => classify_connect_error(port, &err),
        Err(_elapsed) => PortOutcome::timeout(port),
    };

    trace!("{socket_addr} -> {}", outcome.state());
    outcome
}

// errno values shared by Linux, the BSDs and macOS.
const EMFILE: i32 = 24;
const ENFILE: i32 = 23;

fn classify_connect_error(port: u16, err: &io::Error) -> PortOutcome {
    // Out of descriptors: the socket was never created, the target is not at fault.
    if matches!(err.raw_os_error(), Some(EMFILE | ENFILE)) {
        return PortOutcome::local_error(port, err.to_string());
    }
    match err.kind() {
        io::ErrorKind::ConnectionRefused => PortOutcome::closed(port),
        // The kernel gave up on the SYN before our own deadline did.
        io::ErrorKind::TimedOut => PortOutcome::timeout(port),
        _ => PortOutcome::error(port, err.to_string()),
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
