//! Digest type and the hash primitives used for commitments.
//!
//! The primitive is a black box behind [`ContentHasher`]. BLAKE3-256 is the
//! default; SHA-256 is available for peers that standardize on it.

use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use sha2::Digest as _;
use std::fmt;
use std::str::FromStr;

/// Digest length in bytes
pub const DIGEST_LEN: usize = 32;

/// 32-byte commitment digest.
///
/// Displays as lowercase hex, two characters per byte, no prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest(pub [u8; DIGEST_LEN]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a digest from hex. Either case is accepted.
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| Error::InvalidDigest(format!("{s:?}: {e}")))?;
        Ok(Digest(bytes))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Digest::from_hex(s)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A fixed-output hash function.
pub trait ContentHasher: Send + Sync {
    /// Algorithm name, as shown in test vectors and errors
    fn name(&self) -> &'static str;

    /// Hash `bytes` in one shot.
    fn digest(&self, bytes: &[u8]) -> Result<Digest>;
}

/// BLAKE3 with 256-bit output
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3;

impl ContentHasher for Blake3 {
    fn name(&self) -> &'static str {
        "blake3"
    }

    fn digest(&self, bytes: &[u8]) -> Result<Digest> {
        Ok(Digest(*blake3::hash(bytes).as_bytes()))
    }
}

/// SHA-256
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256;

impl ContentHasher for Sha256 {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn digest(&self, bytes: &[u8]) -> Result<Digest> {
        let out = sha2::Sha256::digest(bytes);
        let bytes = <[u8; DIGEST_LEN]>::try_from(out.as_slice()).map_err(|_| Error::HashFailure {
            algorithm: self.name(),
            reason: format!("expected {DIGEST_LEN} output bytes, got {}", out.len()),
        })?;
        Ok(Digest(bytes))
    }
}

/// Built-in hash algorithms
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        self.hasher().name()
    }

    pub fn hasher(&self) -> &'static dyn ContentHasher {
        match self {
            HashAlgorithm::Blake3 => &Blake3,
            HashAlgorithm::Sha256 => &Sha256,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLAKE3_EMPTY: &str = "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262";
    const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_known_empty_digests() {
        assert_eq!(Blake3.digest(b"").unwrap().to_hex(), BLAKE3_EMPTY);
        assert_eq!(Sha256.digest(b"").unwrap().to_hex(), SHA256_EMPTY);
    }

    #[test]
    fn test_hex_round_trip() {
        let digest = Blake3.digest(b"{\"a\":1}").unwrap();
        let hex = digest.to_string();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(Digest::from_hex(&hex).unwrap(), digest);
        assert_eq!(hex.to_uppercase().parse::<Digest>().unwrap(), digest);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(matches!(
            Digest::from_hex("abcd"),
            Err(Error::InvalidDigest(_))
        ));
        assert!(matches!(
            Digest::from_hex(&"zz".repeat(32)),
            Err(Error::InvalidDigest(_))
        ));
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Blake3);
        assert_eq!(HashAlgorithm::Blake3.to_string(), "blake3");
        assert_eq!(HashAlgorithm::Sha256.to_string(), "sha256");
    }
}
