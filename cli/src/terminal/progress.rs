//! Progress bar attached to the scan span.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use colored::*;
use indicatif::ProgressStyle;
use sweepr_common::scan::outcome::PortOutcome;
use sweepr_core::ProgressCallback;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.blue} {msg} [{bar:32.green/bright_black}] {pos}/{len} ports ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .tick_strings(TICK_STRINGS)
    .progress_chars("━╸ ")
}

/// Span the scan runs in. Quiet runs get a plain span and thus no bar.
pub fn scan_span(port_count: usize, q_level: u8) -> Span {
    if q_level > 0 {
        return info_span!("scan");
    }

    let span = info_span!("scan", indicatif.pb_show = true);
    span.pb_set_style(&bar_style());
    span.pb_set_length(port_count as u64);
    span.pb_set_message(&format!("{}", "Probing".bold()));
    span
}

/// Advances the bar by one per outcome and keeps a running open-port count.
pub fn tracker(span: &Span) -> ProgressCallback {
    let span = span.clone();
    let open = AtomicUsize::new(0);

    Arc::new(move |outcome: &PortOutcome| {
        span.pb_inc(1);
        if outcome.state().is_open() {
            let found = open.fetch_add(1, Ordering::Relaxed) + 1;
            span.pb_set_message(&format!(
                "Found {} open",
                found.to_string().green().bold()
            ));
        }
    })
}
