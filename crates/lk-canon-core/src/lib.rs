//! Ledger-Kernel canonical commitments
//!
//! This crate computes the identity of a ledger entry: a digest over a
//! canonical encoding of the entry that ignores field order, serialization
//! details and the mutable `attestations` field.
//!
//! # Modules
//!
//! - [`value`]: Value model (the closed set of record shapes)
//! - [`canonical`]: Canonical text encoding (the normative preimage)
//! - [`cbor`]: Canonical CBOR encoding (separate, non-interoperable scheme)
//! - [`hash`]: Digest type and hash primitives
//! - [`commitment`]: Field exclusion, encoding and hashing
//! - [`ser`]: Build values from any `serde::Serialize` type
//! - [`vectors`]: Cross-language test vectors
//! - [`error`]: Error types
//!
//! # Example
//!
//! ```
//! use lk_canon_core::{commit, preimage, Value};
//!
//! let entry: serde_json::Value =
//!     serde_json::from_str(r#"{"b": 2, "a": 1, "attestations": ["x"]}"#).unwrap();
//! let entry = Value::from(entry);
//!
//! assert_eq!(preimage(&entry, "attestations").unwrap(), br#"{"a":1,"b":2}"#);
//! let id = commit(&entry, "attestations").unwrap();
//! assert_eq!(id.to_hex().len(), 64);
//! ```

pub mod canonical;
pub mod cbor;
pub mod commitment;
pub mod error;
pub mod hash;
mod path;
pub mod ser;
pub mod value;
pub mod vectors;

pub use canonical::{canonical_bytes, TextEncoder, DEFAULT_MAX_DEPTH};
pub use cbor::{canonical_cbor, CborEncoder};
pub use commitment::{commit, preimage, verify, Committer, Scheme, DEFAULT_EXCLUDED_FIELD};
pub use error::{CanonicalizationError, CanonicalizationErrorKind, Error, Result};
pub use hash::{ContentHasher, Digest, HashAlgorithm, DIGEST_LEN};
pub use ser::to_value;
pub use value::{Mapping, Value};
pub use vectors::TestVector;
