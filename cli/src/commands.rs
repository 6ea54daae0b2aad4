pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use sweepr_common::config::{Config, DEFAULT_CONCURRENCY, DEFAULT_ERROR_THRESHOLD, ReportMode};
use sweepr_common::network::range::PortRange;

#[derive(Parser, Debug)]
#[command(name = "sweepr", version)]
#[command(about = "A concurrent TCP port scanner.")]
pub struct CommandLine {
    /// IP address or host name to scan
    pub target: String,

    /// Ports to scan, as a single port or an inclusive range (e.g. 443, 1-1024)
    #[arg(short, long, value_name = "RANGE", default_value = "1-1024")]
    pub ports: PortRange,

    /// Also save the report to this text file
    #[arg(short, long, visible_alias = "file", short_alias = 'f', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Maximum number of ports probed at the same time
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Connect timeout per port, in milliseconds
    #[arg(short, long, value_name = "MS", default_value_t = 1000)]
    pub timeout: u64,

    /// List closed, filtered and failed ports too, not only open ones
    #[arg(short, long)]
    pub all: bool,

    /// Abort after this many consecutive connection errors (0 never aborts)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_ERROR_THRESHOLD)]
    pub error_threshold: usize,

    /// Less output: no banner, headers or progress bar
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            concurrency: self.concurrency,
            timeout: Duration::from_millis(self.timeout),
            report_mode: if self.all {
                ReportMode::All
            } else {
                ReportMode::OpenOnly
            },
            error_threshold: self.error_threshold,
            quiet: self.quiet,
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
