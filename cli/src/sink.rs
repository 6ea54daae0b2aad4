//! # Report Sinks
//!
//! Destinations a finished report can be persisted to, besides the console.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

pub trait ReportSink {
    /// Persists the rendered report lines verbatim.
    fn persist(&self, lines: &[String]) -> anyhow::Result<()>;
}

/// Writes the report to a text file, replacing any previous content.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileSink {
    fn persist(&self, lines: &[String]) -> anyhow::Result<()> {
        let mut contents: String = lines.join("\n");
        contents.push('\n');
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write report to {}", self.path.display()))
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
