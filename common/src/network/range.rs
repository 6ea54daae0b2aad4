//! # Port Range Model
//!
//! An inclusive, non-empty range of TCP ports, parsed from `80` or `1-1024`.

use std::fmt;
use std::str::FromStr;

use crate::error::RangeError;

pub const MIN_PORT: u16 = 1;
pub const MAX_PORT: u16 = u16::MAX;

/// Inclusive range of ports. Both bounds are in `1..=65535` and `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    pub fn new(start: u16, end: u16) -> Result<Self, RangeError> {
        if start < MIN_PORT || end < MIN_PORT {
            return Err(RangeError::ZeroPort);
        }
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(port: u16) -> Result<Self, RangeError> {
        Self::new(port, port)
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Number of ports in the range. Never zero.
    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    pub fn contains(&self, port: u16) -> bool {
        (self.start..=self.end).contains(&port)
    }

    /// The `offset`-th port of the range, counting from `start`.
    pub fn nth(&self, offset: usize) -> Option<u16> {
        if offset >= self.len() {
            return None;
        }
        u16::try_from(usize::from(self.start) + offset).ok()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = u16> + Clone {
        self.start..=self.end
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PortRange {
    type Err = RangeError;

    /// Parses a range string.
    ///
    /// Supported formats:
    /// * **Single**: `"443"`.
    /// * **Range**: `"Start-End"` (e.g. `"1-1024"`), whitespace around bounds is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((start_str, end_str)) => {
                let start = parse_port(start_str)?;
                let end = parse_port(end_str)?;
                Self::new(start, end)
            }
            None => Self::single(parse_port(s)?),
        }
    }
}

fn parse_port(s: &str) -> Result<u16, RangeError> {
    let trimmed = s.trim();
    trimmed
        .parse::<u16>()
        .map_err(|_| RangeError::InvalidPort(trimmed.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
