//! lk-canon - compute the canonical commitment of a Ledger-Kernel entry
//!
//! Reads one JSON entry, drops the excluded field, canonicalizes the rest
//! and prints the lowercase hex digest on stdout.

use clap::Parser;
use lk_canon::config::Config;
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    // Parse configuration
    let config = Config::parse();

    // Initialize logging
    lk_canon::logging::init(&config);

    debug!("lk-canon v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        eprintln!("lk-canon: invalid configuration: {e:#}");
        return ExitCode::from(2);
    }

    match lk_canon::run(&config) {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("lk-canon: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
