//! # Scan Results Model
//!
//! * [`outcome`]: the terminal record of a single probe.
//! * [`report`]: the ordered, immutable result of a whole scan.

pub mod outcome;
pub mod report;
