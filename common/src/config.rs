use std::time::Duration;

use crate::error::ScanError;

pub const DEFAULT_CONCURRENCY: usize = 100;
/// Hard ceiling on simultaneously open sockets. Larger requests are clamped.
///
/// Kept under the common 1024 soft descriptor limit with room left for the
/// runtime, stdio and the report file.
pub const MAX_CONCURRENCY: usize = 768;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);
/// Consecutive ERROR outcomes after which the target is deemed unreachable.
pub const DEFAULT_ERROR_THRESHOLD: usize = 64;

/// Which outcomes make it into the human-facing report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportMode {
    /// Open ports only. Other states are summarized as counts.
    #[default]
    OpenOnly,
    /// Every probed port, whatever its state.
    All,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of probes in flight at once.
    pub concurrency: usize,
    /// Per-probe connect timeout.
    pub timeout: Duration,
    pub report_mode: ReportMode,
    /// Consecutive ERROR outcomes tolerated before aborting. `0` disables the check.
    pub error_threshold: usize,
    /// Suppresses banner, headers and progress output.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            report_mode: ReportMode::default(),
            error_threshold: DEFAULT_ERROR_THRESHOLD,
            quiet: 0,
        }
    }
}

impl Config {
    /// Rejects settings no scan can run with.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrency == 0 {
            return Err(ScanError::InvalidConcurrency);
        }
        if self.timeout.is_zero() {
            return Err(ScanError::InvalidTimeout);
        }
        Ok(())
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
