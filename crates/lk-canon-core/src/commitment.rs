//! Entry commitments
//!
//! `commit(record, excluded_field) = H(encode(record \ excluded_field))`
//!
//! The excluded field holds mutable integrity metadata appended after the
//! entry is created (for ledger entries, `attestations`), so it never
//! contributes to the entry's identity. Removing it is "at most one": a
//! record without the field commits the same way.

use crate::canonical::{TextEncoder, DEFAULT_MAX_DEPTH};
use crate::cbor::CborEncoder;
use crate::error::{Error, Result};
use crate::hash::{ContentHasher, Digest, HashAlgorithm};
use crate::value::{Mapping, Value};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Field reserved for appended attestations on ledger entries
pub const DEFAULT_EXCLUDED_FIELD: &str = "attestations";

/// Canonical encodings a commitment can be computed over.
///
/// Digests from different schemes are independent and never comparable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Canonical text (the normative entry-id preimage)
    #[default]
    Text,
    /// Canonical CBOR
    Cbor,
}

impl Scheme {
    pub fn name(&self) -> &'static str {
        match self {
            Scheme::Text => "text",
            Scheme::Cbor => "cbor",
        }
    }

    fn encode_record(
        &self,
        record: &Mapping,
        excluded: Option<&str>,
        max_depth: usize,
    ) -> Result<Vec<u8>> {
        match self {
            Scheme::Text => Ok(TextEncoder::new(max_depth).encode_record(record, excluded)?),
            Scheme::Cbor => CborEncoder::new(max_depth).encode_record(record, excluded),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compute the commitment of `record` over the canonical text scheme with
/// BLAKE3, leaving out `excluded_field`.
pub fn commit(record: &Value, excluded_field: &str) -> Result<Digest> {
    Committer::default().commit(record, excluded_field)
}

/// Recompute the commitment and compare it with `expected`.
pub fn verify(record: &Value, excluded_field: &str, expected: &Digest) -> Result<()> {
    Committer::default().verify(record, excluded_field, expected)
}

/// The canonical bytes [`commit`] hashes.
pub fn preimage(record: &Value, excluded_field: &str) -> Result<Vec<u8>> {
    Committer::default().preimage(record, excluded_field)
}

/// Computes commitments with a fixed scheme, hash primitive and depth limit.
///
/// Holds no per-call state; one committer can serve any number of threads.
#[derive(Clone)]
pub struct Committer {
    scheme: Scheme,
    hasher: Arc<dyn ContentHasher>,
    max_depth: usize,
}

impl Default for Committer {
    fn default() -> Self {
        Self {
            scheme: Scheme::default(),
            hasher: Arc::new(crate::hash::Blake3),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl fmt::Debug for Committer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Committer")
            .field("scheme", &self.scheme)
            .field("hasher", &self.hasher.name())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl Committer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_algorithm(self, algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Blake3 => self.with_hasher(crate::hash::Blake3),
            HashAlgorithm::Sha256 => self.with_hasher(crate::hash::Sha256),
        }
    }

    /// Use a caller-provided hash primitive.
    pub fn with_hasher(mut self, hasher: impl ContentHasher + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn hash_name(&self) -> &'static str {
        self.hasher.name()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Canonical bytes of `record` without `excluded_field`.
    pub fn preimage(&self, record: &Value, excluded_field: &str) -> Result<Vec<u8>> {
        let map = record_mapping(record)?;
        let bytes = self
            .scheme
            .encode_record(map, Some(excluded_field), self.max_depth)?;
        Ok(bytes)
    }

    /// Digest of the canonical bytes of `record` without `excluded_field`.
    pub fn commit(&self, record: &Value, excluded_field: &str) -> Result<Digest> {
        let bytes = self.preimage(record, excluded_field)?;
        self.hasher.digest(&bytes)
    }

    /// Fails with [`Error::HashMismatch`] when the recomputed digest differs.
    pub fn verify(&self, record: &Value, excluded_field: &str, expected: &Digest) -> Result<()> {
        let computed = self.commit(record, excluded_field)?;
        if computed != *expected {
            return Err(Error::HashMismatch {
                computed: computed.to_hex(),
                expected: expected.to_hex(),
            });
        }
        Ok(())
    }
}

fn record_mapping(record: &Value) -> Result<&Mapping> {
    record.as_mapping().ok_or(Error::InvalidRecordShape {
        found: record.kind(),
    })
}
