//! lk-canon - Ledger-Kernel entry commitment tool
//!
//! This crate provides:
//! - Command-line configuration
//! - Record loading (file or stdin) through the JSON decoder
//! - Digest, preimage, verification and test-vector output modes
//! - Logging setup

pub mod cli;
pub mod config;
pub mod logging;

pub use cli::{run, CliError};
pub use config::Config;
