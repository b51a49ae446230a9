//! logtally CLI library surface
//!
//! The binary in `main.rs` is a thin wrapper; argument parsing, config
//! resolution, and report rendering live here so they can be tested directly.

pub mod analyze;
pub mod cli;
pub mod error;
pub mod logging;
pub mod output;
