//! Test vectors for cross-language validation
//!
//! Every implementation of the entry-id scheme MUST reproduce these
//! `canonical_hex` and `hash_hex` values exactly.

use crate::commitment::{Committer, Scheme, DEFAULT_EXCLUDED_FIELD};
use crate::error::Result;
use crate::value::Value;
use serde::Serialize;

/// Test vector output format (JSON serializable)
#[derive(Clone, Debug, Serialize)]
pub struct TestVector {
    pub name: String,
    pub description: String,
    pub scheme: Scheme,
    pub hash: String,
    pub excluded_field: String,
    pub input: Value,
    pub canonical_hex: String,
    pub hash_hex: String,
}

impl TestVector {
    /// Compute the vector for `input` under `committer`.
    pub fn compute(
        name: impl Into<String>,
        description: impl Into<String>,
        input: Value,
        committer: &Committer,
        excluded_field: &str,
    ) -> Result<Self> {
        let bytes = committer.preimage(&input, excluded_field)?;
        let digest = committer.commit(&input, excluded_field)?;
        Ok(TestVector {
            name: name.into(),
            description: description.into(),
            scheme: committer.scheme(),
            hash: committer.hash_name().to_owned(),
            excluded_field: excluded_field.to_owned(),
            input,
            canonical_hex: hex::encode(bytes),
            hash_hex: digest.to_hex(),
        })
    }
}

/// Inputs of the built-in vector set: `(name, description, record)`.
pub fn builtin_inputs() -> Vec<(&'static str, &'static str, Value)> {
    vec![
        (
            "flat_entry",
            "keys reordered, attestations dropped",
            Value::mapping([
                ("b", Value::from(2)),
                ("a", Value::from(1)),
                ("attestations", Value::sequence(["x"])),
            ]),
        ),
        (
            "nested_entry",
            "nested mappings sorted, sequence order kept",
            Value::mapping([(
                "a",
                Value::sequence([
                    Value::from(1),
                    Value::from(2),
                    Value::mapping([("z", 0), ("y", 1)]),
                ]),
            )]),
        ),
        (
            "entry_without_attestations",
            "absent excluded field is not an error",
            Value::mapping([
                ("seq", Value::from(7)),
                ("prev", Value::Null),
                ("ok", Value::Bool(true)),
            ]),
        ),
        (
            "escapes_and_unicode",
            "fixed escape table, raw non-ASCII",
            Value::mapping([
                ("msg", Value::from("line\nbreak \"quoted\" \\ tab\t")),
                ("ctl", Value::from("\u{1}")),
                ("snowman", Value::from("☃")),
            ]),
        ),
        (
            "integer_extremes",
            "full i64/u64 range, integral float accepted",
            Value::mapping([
                ("min", Value::from(i64::MIN)),
                ("max", Value::from(u64::MAX)),
                ("neg", Value::from(-7)),
                ("two", Value::Float(2.0)),
            ]),
        ),
    ]
}

/// Compute the built-in vector set under `committer`.
pub fn builtin_vectors(committer: &Committer) -> Result<Vec<TestVector>> {
    builtin_inputs()
        .into_iter()
        .map(|(name, description, input)| {
            TestVector::compute(name, description, input, committer, DEFAULT_EXCLUDED_FIELD)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashAlgorithm;

    fn canonical_text(vector: &TestVector) -> String {
        String::from_utf8(hex::decode(&vector.canonical_hex).unwrap()).unwrap()
    }

    #[test]
    fn test_generate_vectors() {
        let vectors = builtin_vectors(&Committer::new()).unwrap();
        assert_eq!(vectors.len(), builtin_inputs().len());

        // Print JSON for manual inspection / export
        let json = serde_json::to_string_pretty(&vectors).unwrap();
        println!("Test Vectors:\n{}", json);
    }

    #[test]
    fn test_text_vector_preimages() {
        let vectors = builtin_vectors(&Committer::new()).unwrap();
        let texts: Vec<String> = vectors.iter().map(canonical_text).collect();
        assert_eq!(
            texts,
            vec![
                r#"{"a":1,"b":2}"#.to_string(),
                r#"{"a":[1,2,{"y":1,"z":0}]}"#.to_string(),
                r#"{"ok":true,"prev":null,"seq":7}"#.to_string(),
                "{\"ctl\":\"\\u0001\",\"msg\":\"line\\nbreak \\\"quoted\\\" \\\\ tab\\t\",\"snowman\":\"☃\"}"
                    .to_string(),
                r#"{"max":18446744073709551615,"min":-9223372036854775808,"neg":-7,"two":2}"#
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_vector_hash_is_blake3_of_preimage() {
        for vector in builtin_vectors(&Committer::new()).unwrap() {
            let bytes = hex::decode(&vector.canonical_hex).unwrap();
            assert_eq!(vector.hash_hex, blake3::hash(&bytes).to_hex().to_string());
            assert_eq!(vector.hash, "blake3");
            assert_eq!(vector.scheme, Scheme::Text);
        }
    }

    #[test]
    fn test_vectors_deterministic() {
        let committer = Committer::new()
            .with_scheme(Scheme::Cbor)
            .with_algorithm(HashAlgorithm::Sha256);
        let v1 = builtin_vectors(&committer).unwrap();
        let v2 = builtin_vectors(&committer).unwrap();
        for (a, b) in v1.iter().zip(&v2) {
            assert_eq!(a.canonical_hex, b.canonical_hex);
            assert_eq!(a.hash_hex, b.hash_hex);
        }
    }

    #[test]
    fn test_vector_json_shape() {
        let vector = TestVector::compute(
            "one",
            "single key",
            Value::mapping([("k", 1)]),
            &Committer::new(),
            DEFAULT_EXCLUDED_FIELD,
        )
        .unwrap();
        let json = serde_json::to_value(&vector).unwrap();
        assert_eq!(json["scheme"], "text");
        assert_eq!(json["hash"], "blake3");
        assert_eq!(json["excluded_field"], "attestations");
        assert_eq!(json["input"], serde_json::json!({"k": 1}));
        assert_eq!(json["canonical_hex"], hex::encode(b"{\"k\":1}"));
    }
}
