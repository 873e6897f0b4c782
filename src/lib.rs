//! Synthetic license usage data: capacity/usage/denial series with controlled
//! peaks, and random export records drawn from reference tables.

/// Command-line parsing for the `usage-synth` binary.
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod records;
pub mod series;
