//! # Address Resolution
//!
//! Turns the user's target string into one connectable address, before any
//! probe is scheduled.

use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use sweepr_common::error::ScanError;
use tokio::net::lookup_host;
use tracing::debug;

#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, target: &str) -> Result<IpAddr, ScanError>;
}

/// Resolves through the operating system's resolver. IP literals skip the lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

#[async_trait]
impl AddressResolver for SystemResolver {
    async fn resolve(&self, target: &str) -> Result<IpAddr, ScanError> {
        let host = target.trim();
        if host.is_empty() {
            return Err(ScanError::Resolution {
                target: target.to_string(),
                reason: "empty host name".to_string(),
            });
        }

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(ip);
        }

        let addrs: Vec<IpAddr> = lookup_host((host, 0))
            .await
            .map_err(|e| ScanError::Resolution {
                target: host.to_string(),
                reason: e.to_string(),
            })?
            .map(|socket_addr: SocketAddr| socket_addr.ip())
            .collect();

        debug!("{host} resolved to {addrs:?}");

        preferred_addr(&addrs).ok_or_else(|| ScanError::NoAddress {
            target: host.to_string(),
        })
    }
}

/// First IPv4 address if there is one, otherwise the first address at all.
fn preferred_addr(addrs: &[IpAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .copied()
        .find(IpAddr::is_ipv4)
        .or_else(|| addrs.first().copied())
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
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn preferred_addr_picks_ipv4_first() {
        let v6 = IpAddr::V6(Ipv6Addr::LOCALHOST);
        let v4 = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert_eq!(preferred_addr(&[v6, v4]), Some(v4));
        assert_eq!(preferred_addr(&[v6]), Some(v6));
        assert_eq!(preferred_addr(&[]), None);
    }

    #[tokio::test]
    async fn resolve_accepts_ip_literals() {
        let ip = SystemResolver.resolve("127.0.0.1").await.unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::LOCALHOST));

        let ip = SystemResolver.resolve(" ::1 ").await.unwrap();
        assert_eq!(ip, IpAddr::V6(Ipv6Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn resolve_rejects_empty_target() {
        let err = SystemResolver.resolve("  ").await.unwrap_err();
        assert!(err.is_resolution_failure());
    }

    #[tokio::test]
    async fn resolve_fails_for_reserved_invalid_tld() {
        let err = SystemResolver.resolve("doesnotexist.invalid").await.unwrap_err();
        assert!(err.is_resolution_failure(), "unexpected error: {err}");
    }

    #[tokio::test]
    #[ignore]
    async fn resolve_public_hostname() {
        let ip = SystemResolver.resolve("one.one.one.one").await.unwrap();
        assert!(ip.is_ipv4());
    }
}
