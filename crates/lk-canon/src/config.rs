//! Configuration for lk-canon

use clap::{Parser, ValueEnum};
use lk_canon_core::{Digest, HashAlgorithm, Scheme, DEFAULT_EXCLUDED_FIELD, DEFAULT_MAX_DEPTH};
use std::path::PathBuf;

/// lk-canon - Ledger-Kernel entry commitment tool
#[derive(Parser, Debug, Clone)]
#[command(name = "lk-canon")]
#[command(author, version, about = "Compute the canonical commitment of a Ledger-Kernel entry")]
pub struct Config {
    /// Path to the JSON entry (`-` reads stdin)
    pub record: PathBuf,

    /// Top-level field left out of the commitment
    #[arg(long, env = "LK_EXCLUDE_FIELD", default_value = DEFAULT_EXCLUDED_FIELD)]
    pub exclude: String,

    /// Canonical encoding to hash
    #[arg(long, value_enum, default_value_t = SchemeArg::Text)]
    pub scheme: SchemeArg,

    /// Hash primitive
    #[arg(long, value_enum, default_value_t = HashArg::Blake3)]
    pub hash: HashArg,

    /// Maximum container nesting accepted by the encoder
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Verify the entry against this hex digest instead of printing one
    #[arg(long, value_name = "HEX")]
    pub expect: Option<String>,

    /// Print the canonical preimage instead of its digest
    #[arg(long)]
    pub preimage: bool,

    /// Print a JSON test vector with this name
    #[arg(long, value_name = "NAME")]
    pub vector: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log format (json or pretty)
    #[arg(long, default_value = "pretty")]
    pub log_format: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    Text,
    Cbor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HashArg {
    Blake3,
    Sha256,
}

impl From<SchemeArg> for Scheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Text => Scheme::Text,
            SchemeArg::Cbor => Scheme::Cbor,
        }
    }
}

impl From<HashArg> for HashAlgorithm {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::Blake3 => HashAlgorithm::Blake3,
            HashArg::Sha256 => HashAlgorithm::Sha256,
        }
    }
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let modes = [self.expect.is_some(), self.preimage, self.vector.is_some()];
        if modes.iter().filter(|on| **on).count() > 1 {
            anyhow::bail!("--expect, --preimage and --vector are mutually exclusive");
        }
        if let Some(expected) = &self.expect {
            Digest::from_hex(expected)?;
        }
        if let Some(name) = &self.vector {
            if name.trim().is_empty() {
                anyhow::bail!("Vector name cannot be empty");
            }
        }
        if self.max_depth == 0 {
            anyhow::bail!("--max-depth must be at least 1");
        }
        // The JSON decoder refuses deeper input before the encoder sees it.
        if self.max_depth > DEFAULT_MAX_DEPTH {
            anyhow::bail!(
                "--max-depth cannot exceed {} (the JSON decoder's nesting limit)",
                DEFAULT_MAX_DEPTH
            );
        }
        if !matches!(self.log_format.as_str(), "pretty" | "json") {
            anyhow::bail!("Unknown log format {:?} (expected json or pretty)", self.log_format);
        }
        Ok(())
    }

    /// Whether the record is read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.record.as_os_str() == "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::parse_from(std::iter::once("lk-canon").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["entry.json"]);
        assert_eq!(config.exclude, "attestations");
        assert_eq!(config.scheme, SchemeArg::Text);
        assert_eq!(config.hash, HashArg::Blake3);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!config.reads_stdin());
        config.validate().unwrap();
    }

    #[test]
    fn test_stdin_marker() {
        assert!(parse(&["-"]).reads_stdin());
    }

    #[test]
    fn test_modes_are_exclusive() {
        let config = parse(&["e.json", "--preimage", "--vector", "v"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expect_must_be_hex_digest() {
        assert!(parse(&["e.json", "--expect", "abc"]).validate().is_err());
        let ok = "00".repeat(32);
        parse(&["e.json", "--expect", &ok]).validate().unwrap();
    }

    #[test]
    fn test_rejects_zero_depth_and_unknown_log_format() {
        assert!(parse(&["e.json", "--max-depth", "0"]).validate().is_err());
        assert!(parse(&["e.json", "--log-format", "xml"]).validate().is_err());
    }

    #[test]
    fn test_max_depth_capped_at_decoder_limit() {
        parse(&["e.json", "--max-depth", "128"]).validate().unwrap();
        let err = parse(&["e.json", "--max-depth", "200"]).validate().unwrap_err();
        assert!(err.to_string().contains("cannot exceed 128"));
    }

    #[test]
    fn test_value_enums_map_to_core() {
        let config = parse(&["e.json", "--scheme", "cbor", "--hash", "sha256"]);
        assert_eq!(Scheme::from(config.scheme), Scheme::Cbor);
        assert_eq!(HashAlgorithm::from(config.hash), HashAlgorithm::Sha256);
    }
}
