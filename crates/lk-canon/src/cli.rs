//! Command execution: load an entry, commit to it, render the result

use crate::config::Config;
use lk_canon_core::{Committer, Digest, Scheme, TestVector, Value};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Commit(#[from] lk_canon_core::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CliError {
    /// Process exit status: 2 for unusable input, 1 for rejected entries
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Read { .. } | CliError::Decode { .. } => 2,
            CliError::Commit(_) | CliError::Encode(_) => 1,
        }
    }
}

/// Source name reported for records read from stdin
const STDIN_LABEL: &str = "<stdin>";

/// Read and decode the entry named by `path` (`-` reads stdin).
pub fn load_record(path: &Path) -> Result<Value, CliError> {
    let from_stdin = path.as_os_str() == "-";
    let label = if from_stdin {
        STDIN_LABEL.to_owned()
    } else {
        path.display().to_string()
    };

    let text = if from_stdin {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map(|_| buf)
    } else {
        fs::read_to_string(path)
    }
    .map_err(|source| CliError::Read {
        path: label.clone(),
        source,
    })?;

    let json: serde_json::Value = serde_json::from_str(&text).map_err(|source| CliError::Decode {
        path: label,
        source,
    })?;
    Ok(Value::from(json))
}

/// Build the committer described by `config`.
pub fn committer(config: &Config) -> Committer {
    Committer::new()
        .with_scheme(config.scheme.into())
        .with_algorithm(config.hash.into())
        .with_max_depth(config.max_depth)
}

/// Run against an already-decoded record and return the line for stdout.
pub fn execute(config: &Config, record: Value) -> Result<String, CliError> {
    let committer = committer(config);
    debug!(
        scheme = %committer.scheme(),
        hash = committer.hash_name(),
        exclude = %config.exclude,
        "computing commitment"
    );
    if let Some(map) = record.as_mapping() {
        if !map.contains_key(&config.exclude) {
            debug!(field = %config.exclude, "excluded field not present");
        }
    }

    if config.preimage {
        let bytes = committer.preimage(&record, &config.exclude)?;
        return Ok(match committer.scheme() {
            Scheme::Text => String::from_utf8_lossy(&bytes).into_owned(),
            Scheme::Cbor => hex::encode(bytes),
        });
    }

    if let Some(name) = &config.vector {
        let vector = TestVector::compute(
            name.as_str(),
            format!("computed from {}", config.record.display()),
            record,
            &committer,
            &config.exclude,
        )?;
        return serde_json::to_string_pretty(&vector).map_err(CliError::Encode);
    }

    if let Some(expected) = &config.expect {
        let expected = Digest::from_hex(expected)?;
        committer.verify(&record, &config.exclude, &expected)?;
        info!(digest = %expected, "entry verified");
        return Ok(expected.to_hex());
    }

    let digest = committer.commit(&record, &config.exclude)?;
    info!(digest = %digest, "commitment computed");
    Ok(digest.to_hex())
}

/// Load the configured record and run.
pub fn run(config: &Config) -> Result<String, CliError> {
    let record = load_record(&config.record)?;
    execute(config, record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config(args: &[&str]) -> Config {
        Config::parse_from(std::iter::once("lk-canon").chain(args.iter().copied()))
    }

    fn write_record(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_run_worked_example() {
        let file = write_record(r#"{"b": 2, "a": 1, "attestations": ["x"]}"#);
        let path = file.path().to_str().unwrap();
        let out = run(&config(&[path])).unwrap();
        assert_eq!(out, blake3::hash(br#"{"a":1,"b":2}"#).to_hex().to_string());
    }

    #[test]
    fn test_preimage_modes() {
        let file = write_record(r#"{"b": 2, "a": 1, "attestations": ["x"]}"#);
        let path = file.path().to_str().unwrap();
        assert_eq!(run(&config(&[path, "--preimage"])).unwrap(), r#"{"a":1,"b":2}"#);
        assert_eq!(
            run(&config(&[path, "--preimage", "--scheme", "cbor"])).unwrap(),
            "a2616101616202"
        );
    }

    #[test]
    fn test_custom_exclude() {
        let file = write_record(r#"{"a": 1, "sig": "zz"}"#);
        let path = file.path().to_str().unwrap();
        assert_eq!(
            run(&config(&[path, "--preimage", "--exclude", "sig"])).unwrap(),
            r#"{"a":1}"#
        );
    }

    #[test]
    fn test_verify_mode() {
        let file = write_record(r#"{"a": 1}"#);
        let path = file.path().to_str().unwrap();
        let digest = run(&config(&[path])).unwrap();
        assert_eq!(run(&config(&[path, "--expect", &digest])).unwrap(), digest);

        let wrong = "00".repeat(32);
        let err = run(&config(&[path, "--expect", &wrong])).unwrap_err();
        assert!(matches!(
            err,
            CliError::Commit(lk_canon_core::Error::HashMismatch { .. })
        ));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_vector_mode() {
        let file = write_record(r#"{"a": 1}"#);
        let path = file.path().to_str().unwrap();
        let out = run(&config(&[path, "--vector", "single"])).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["name"], "single");
        assert_eq!(json["canonical_hex"], hex::encode(br#"{"a":1}"#));
    }

    #[test]
    fn test_error_exit_codes() {
        let missing = run(&config(&["/nonexistent/entry.json"])).unwrap_err();
        assert!(matches!(missing, CliError::Read { .. }));
        assert_eq!(missing.exit_code(), 2);

        let malformed = write_record("{\"a\": ");
        let err = run(&config(&[malformed.path().to_str().unwrap()])).unwrap_err();
        assert!(matches!(err, CliError::Decode { .. }));
        assert_eq!(err.exit_code(), 2);

        let float = write_record(r#"{"a": 1.5}"#);
        let err = run(&config(&[float.path().to_str().unwrap()])).unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "non-integer number 1.5 at $.a");
    }
}
