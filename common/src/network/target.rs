//! # Scan Target Model
//!
//! A [`ScanTarget`] is what the scheduler works on: the address the user's
//! input resolved to, plus the ports to probe on it. It is built once after
//! resolution and never changes afterwards.

use std::fmt;
use std::net::IpAddr;

use crate::network::range::PortRange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    input: String,
    addr: IpAddr,
    ports: PortRange,
}

impl ScanTarget {
    pub fn new(input: impl Into<String>, addr: IpAddr, ports: PortRange) -> Self {
        Self {
            input: input.into(),
            addr,
            ports,
        }
    }

    /// The host string as the user typed it.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn ports(&self) -> PortRange {
        self.ports
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.input == self.addr.to_string() {
            write!(f, "{}", self.addr)
        } else {
            write!(f, "{} ({})", self.input, self.addr)
        }
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
