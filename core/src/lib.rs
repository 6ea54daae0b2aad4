//! # Sweepr Core
//!
//! The concurrent scan engine.
//!
//! * **[`resolver`]**: target string to address.
//! * **[`network::tcp`]**: a single connect probe, classified into an outcome.
//! * **[`scanner`]**: the bounded worker pool that drives the probes.
//! * **[`aggregator`]**: ordering, labelling and filtering of outcomes.
//! * **[`service`]**: the use case tying the above together.

pub mod aggregator;
pub mod network;
pub mod resolver;
pub mod scanner;
pub mod service;

pub use scanner::{CancelToken, ProgressCallback};
pub use service::ScanService;
