//! Canonical text encoding for Ledger-Kernel entries
//!
//! The normative preimage for entry commitments. Every value has exactly one
//! encoding:
//! - `null`, `true`, `false`
//! - Integers in plain decimal: no `+`, no leading zeros, no point or exponent
//! - Integral floats encode as the equal integer; any other float is rejected
//! - Strings as JSON literals with the fixed escape table in [`write_text`]
//! - Sequences as `[a,b]` in element order
//! - Mappings as `{"k":v}` in ascending byte-wise key order
//! - No whitespace anywhere
//!
//! Implementations in other languages MUST produce identical bytes.

use crate::error::CanonicalizationError;
use crate::path::{Cursor, Segment};
use crate::value::{Mapping, Value};

/// Nesting limit applied when none is configured. Matches the JSON
/// decoder's own recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Encode a value to canonical text bytes with the default depth limit.
pub fn canonical_bytes(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    TextEncoder::default().encode(value)
}

/// Canonical text encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextEncoder {
    max_depth: usize,
}

impl Default for TextEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl TextEncoder {
    /// Encoder that rejects containers nested deeper than `max_depth`.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        let mut out = Vec::new();
        let mut cursor = Cursor::new(self.max_depth);
        write_value(&mut out, value, &mut cursor)?;
        Ok(out)
    }

    /// Encode a top-level mapping, leaving out the entry named `excluded`.
    ///
    /// The result is identical to encoding a copy of `record` with that entry
    /// removed; `record` itself is only borrowed.
    pub fn encode_record(
        &self,
        record: &Mapping,
        excluded: Option<&str>,
    ) -> Result<Vec<u8>, CanonicalizationError> {
        let mut out = Vec::new();
        let mut cursor = Cursor::new(self.max_depth);
        let entries = record
            .iter()
            .filter(|(key, _)| Some(key.as_str()) != excluded);
        write_entries(&mut out, entries, &mut cursor)?;
        Ok(out)
    }
}

fn write_value<'a>(
    out: &mut Vec<u8>,
    value: &'a Value,
    cursor: &mut Cursor<'a>,
) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Integer(i) => write_integer(out, *i),
        Value::Float(f) => write_integer(out, cursor.integral(*f)?),
        Value::Text(s) => write_text(out, s),
        Value::Sequence(items) => {
            cursor.descend()?;
            out.push(b'[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(b',');
                }
                cursor.push(Segment::Index(index));
                write_value(out, item, cursor)?;
                cursor.pop();
            }
            out.push(b']');
            cursor.ascend();
        }
        Value::Mapping(map) => write_entries(out, map.iter(), cursor)?,
    }
    Ok(())
}

/// Entries must arrive in ascending key order; `BTreeMap` iteration
/// guarantees that.
fn write_entries<'a, I>(
    out: &mut Vec<u8>,
    entries: I,
    cursor: &mut Cursor<'a>,
) -> Result<(), CanonicalizationError>
where
    I: Iterator<Item = (&'a String, &'a Value)>,
{
    cursor.descend()?;
    out.push(b'{');
    for (index, (key, value)) in entries.enumerate() {
        if index > 0 {
            out.push(b',');
        }
        write_text(out, key);
        out.push(b':');
        cursor.push(Segment::Key(key.as_str()));
        write_value(out, value, cursor)?;
        cursor.pop();
    }
    out.push(b'}');
    cursor.ascend();
    Ok(())
}

fn write_integer(out: &mut Vec<u8>, i: i128) {
    out.extend_from_slice(i.to_string().as_bytes());
}

/// Write `s` as a quoted string literal.
///
/// Escape table:
/// - `"` and `\` are backslash-escaped
/// - U+0008, U+0009, U+000A, U+000C, U+000D use `\b`, `\t`, `\n`, `\f`, `\r`
/// - every other code point below U+0020 is `\u00XX` with lowercase hex
/// - everything else, including `/`, U+007F and all non-ASCII, is raw UTF-8
pub fn write_text(out: &mut Vec<u8>, s: &str) {
    out.push(b'"');
    let bytes = s.as_bytes();
    let mut start = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let escape: &[u8] = match byte {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            0x08 => b"\\b",
            b'\t' => b"\\t",
            b'\n' => b"\\n",
            0x0c => b"\\f",
            b'\r' => b"\\r",
            0x00..=0x1f => {
                out.extend_from_slice(&bytes[start..i]);
                out.extend_from_slice(&[
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX_DIGITS[usize::from(byte >> 4)],
                    HEX_DIGITS[usize::from(byte & 0x0f)],
                ]);
                start = i + 1;
                continue;
            }
            _ => continue,
        };
        out.extend_from_slice(&bytes[start..i]);
        out.extend_from_slice(escape);
        start = i + 1;
    }
    out.extend_from_slice(&bytes[start..]);
    out.push(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CanonicalizationErrorKind;
    use serde_json::json;

    fn encode_json(v: serde_json::Value) -> Result<String, CanonicalizationError> {
        canonical_bytes(&Value::from(v)).map(|bytes| String::from_utf8(bytes).unwrap())
    }

    fn text(s: &str) -> String {
        let mut out = Vec::new();
        write_text(&mut out, s);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(encode_json(json!(null)).unwrap(), "null");
        assert_eq!(encode_json(json!(true)).unwrap(), "true");
        assert_eq!(encode_json(json!(false)).unwrap(), "false");
        assert_eq!(encode_json(json!(42)).unwrap(), "42");
        assert_eq!(encode_json(json!(-7)).unwrap(), "-7");
        assert_eq!(encode_json(json!(0)).unwrap(), "0");
        assert_eq!(encode_json(json!("hi")).unwrap(), "\"hi\"");
    }

    #[test]
    fn test_integer_extremes() {
        assert_eq!(
            encode_json(json!(i64::MIN)).unwrap(),
            "-9223372036854775808"
        );
        assert_eq!(
            encode_json(json!(u64::MAX)).unwrap(),
            "18446744073709551615"
        );
        let wide = canonical_bytes(&Value::Integer(i128::MIN)).unwrap();
        assert_eq!(wide, i128::MIN.to_string().into_bytes());
    }

    #[test]
    fn test_integral_floats_encode_as_integers() {
        assert_eq!(encode_json(json!(2.0)).unwrap(), "2");
        assert_eq!(encode_json(json!(-0.0)).unwrap(), "0");
        assert_eq!(encode_json(json!(-3.0)).unwrap(), "-3");
        assert_eq!(encode_json(json!(1e3)).unwrap(), "1000");
    }

    #[test]
    fn test_integral_floats_beyond_i64() {
        let as_float = encode_json(json!({"n": 1e19})).unwrap();
        let as_int = encode_json(json!({"n": 10000000000000000000u64})).unwrap();
        assert_eq!(as_float, "{\"n\":10000000000000000000}");
        assert_eq!(as_float, as_int);
        assert_eq!(
            encode_json(json!(-1e20)).unwrap(),
            "-100000000000000000000"
        );
    }

    #[test]
    fn test_fractional_float_rejected() {
        let err = encode_json(json!({"a": [1, 1.5]})).unwrap_err();
        assert_eq!(err.kind(), CanonicalizationErrorKind::NonIntegerNumber);
        assert_eq!(err.path(), "$.a[1]");

        let err = canonical_bytes(&Value::Float(f64::NAN)).unwrap_err();
        assert_eq!(err.kind(), CanonicalizationErrorKind::NonIntegerNumber);
        let err = canonical_bytes(&Value::Float(f64::INFINITY)).unwrap_err();
        assert_eq!(err.kind(), CanonicalizationErrorKind::NonIntegerNumber);
        let err = canonical_bytes(&Value::Float(1e300)).unwrap_err();
        assert_eq!(err.kind(), CanonicalizationErrorKind::NonIntegerNumber);
    }

    #[test]
    fn test_containers() {
        assert_eq!(encode_json(json!([])).unwrap(), "[]");
        assert_eq!(encode_json(json!({})).unwrap(), "{}");
        assert_eq!(encode_json(json!([1, "a", null])).unwrap(), "[1,\"a\",null]");
        assert_eq!(
            encode_json(json!({"b": 2, "a": 1})).unwrap(),
            "{\"a\":1,\"b\":2}"
        );
    }

    #[test]
    fn test_nested_keys_sorted() {
        assert_eq!(
            encode_json(json!({"a": [1, 2, {"z": 0, "y": 1}]})).unwrap(),
            "{\"a\":[1,2,{\"y\":1,\"z\":0}]}"
        );
    }

    #[test]
    fn test_key_order_is_bytewise() {
        assert_eq!(
            encode_json(json!({"b": 0, "a": 0, "B": 0, "é": 0, "aa": 0})).unwrap(),
            "{\"B\":0,\"a\":0,\"aa\":0,\"b\":0,\"é\":0}"
        );
    }

    #[test]
    fn test_escape_table() {
        assert_eq!(text("a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(text("\u{8}\t\n\u{c}\r"), r#""\b\t\n\f\r""#);
        assert_eq!(text("\u{0}\u{1f}\u{1b}"), r#""\u0000\u001f\u001b""#);
        assert_eq!(text("/\u{7f}é\u{2028}☃"), "\"/\u{7f}é\u{2028}☃\"");
        assert_eq!(text(""), "\"\"");
    }

    #[test]
    fn test_escape_table_matches_json_encoder() {
        let samples = [
            "plain",
            "quote\" backslash\\",
            "ctl \u{0}\u{1}\u{7}\u{8}\u{b}\u{1f}",
            "ws \t\n\r\u{c}",
            "unicode é ☃ 𝄞 \u{2028}\u{2029}",
            "del \u{7f} slash /",
        ];
        for s in samples {
            assert_eq!(text(s), serde_json::to_string(s).unwrap(), "sample {s:?}");
        }
    }

    #[test]
    fn test_deterministic() {
        let value = Value::from(json!({"x": [1, {"b": null, "a": true}], "y": "z"}));
        assert_eq!(
            canonical_bytes(&value).unwrap(),
            canonical_bytes(&value).unwrap()
        );
    }

    #[test]
    fn test_encode_record_excludes_field() {
        let value = Value::from(json!({"b": 2, "a": 1, "attestations": ["x"]}));
        let record = value.as_mapping().unwrap();
        let bytes = TextEncoder::default()
            .encode_record(record, Some("attestations"))
            .unwrap();
        assert_eq!(bytes, b"{\"a\":1,\"b\":2}");

        let all = TextEncoder::default().encode_record(record, None).unwrap();
        assert_eq!(all, b"{\"a\":1,\"attestations\":[\"x\"],\"b\":2}");
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_excluding_only_entry_yields_empty_mapping() {
        let value = Value::from(json!({"attestations": 1}));
        let bytes = TextEncoder::default()
            .encode_record(value.as_mapping().unwrap(), Some("attestations"))
            .unwrap();
        assert_eq!(bytes, b"{}");
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::Integer(0);
        for _ in 0..4 {
            value = Value::sequence([value]);
        }
        assert_eq!(
            TextEncoder::new(4).encode(&value).unwrap(),
            b"[[[[0]]]]"
        );

        let err = TextEncoder::new(3).encode(&value).unwrap_err();
        assert_eq!(
            err,
            CanonicalizationError::DepthExceeded {
                limit: 3,
                path: "$[0][0][0]".into()
            }
        );
    }

    #[test]
    fn test_deep_nesting_rejected_not_overflowed() {
        let mut value = Value::Null;
        for _ in 0..(DEFAULT_MAX_DEPTH * 4) {
            value = Value::mapping([("k", value)]);
        }
        let err = canonical_bytes(&value).unwrap_err();
        assert_eq!(err.kind(), CanonicalizationErrorKind::DepthExceeded);
    }
}
