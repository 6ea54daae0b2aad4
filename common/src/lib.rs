//! # Sweepr Common
//!
//! Shared vocabulary of the scanner: what is scanned ([`network`]), what a scan
//! produces ([`scan`]), how it is tuned ([`config`]) and how it fails ([`error`]).
//!
//! Nothing in this crate performs I/O.

pub mod config;
pub mod error;
pub mod network;
pub mod scan;
pub mod services;
