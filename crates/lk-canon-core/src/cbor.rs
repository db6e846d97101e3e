//! Canonical CBOR encoding (RFC 7049 §3.9)
//!
//! An alternative binary preimage over the same value model. Its digests are
//! a separate scheme and are never comparable with the text scheme's.
//!
//! Rules:
//! - Integers use the shortest head (major type 0 or 1)
//! - Integral floats encode as the equal integer; any other float is rejected
//! - Strings, arrays and maps use definite lengths
//! - Map keys are ordered by encoded length first, then byte-wise
//!
//! Head and length encoding is left to `ciborium`, which always picks the
//! shortest form. It does not order map keys, so entries are sorted here
//! before the tree is handed over.

use crate::canonical::DEFAULT_MAX_DEPTH;
use crate::error::{CanonicalizationError, Error, Result};
use crate::path::{Cursor, Segment};
use crate::value::{Mapping, Value};
use ciborium::value::{Integer, Value as CborValue};

/// Encode a value to canonical CBOR with the default depth limit.
pub fn canonical_cbor(value: &Value) -> Result<Vec<u8>> {
    CborEncoder::default().encode(value)
}

/// Canonical CBOR encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CborEncoder {
    max_depth: usize,
}

impl Default for CborEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl CborEncoder {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(self.max_depth);
        let tree = to_cbor(value, &mut cursor)?;
        write(&tree)
    }

    /// Encode a top-level mapping, leaving out the entry named `excluded`.
    pub fn encode_record(&self, record: &Mapping, excluded: Option<&str>) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(self.max_depth);
        let entries = record
            .iter()
            .filter(|(key, _)| Some(key.as_str()) != excluded);
        let tree = map_to_cbor(entries, &mut cursor)?;
        write(&tree)
    }
}

fn write(tree: &CborValue) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ciborium::into_writer(tree, &mut out).map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(out)
}

fn integer(i: i128, cursor: &Cursor<'_>) -> std::result::Result<CborValue, CanonicalizationError> {
    Integer::try_from(i)
        .map(CborValue::Integer)
        .map_err(|_| cursor.unsupported("integer wider than 64 bits"))
}

fn to_cbor<'a>(
    value: &'a Value,
    cursor: &mut Cursor<'a>,
) -> std::result::Result<CborValue, CanonicalizationError> {
    Ok(match value {
        Value::Null => CborValue::Null,
        Value::Bool(b) => CborValue::Bool(*b),
        Value::Integer(i) => integer(*i, cursor)?,
        Value::Float(f) => integer(cursor.integral(*f)?, cursor)?,
        Value::Text(s) => CborValue::Text(s.clone()),
        Value::Sequence(items) => {
            cursor.descend()?;
            let mut array = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                cursor.push(Segment::Index(index));
                array.push(to_cbor(item, cursor)?);
                cursor.pop();
            }
            cursor.ascend();
            CborValue::Array(array)
        }
        Value::Mapping(map) => map_to_cbor(map.iter(), cursor)?,
    })
}

fn map_to_cbor<'a, I>(
    entries: I,
    cursor: &mut Cursor<'a>,
) -> std::result::Result<CborValue, CanonicalizationError>
where
    I: Iterator<Item = (&'a String, &'a Value)>,
{
    cursor.descend()?;

    // A text key's encoding is its length head followed by its bytes, so
    // (length, bytes) order on the key is the encoded-key order.
    let mut sorted: Vec<(&'a String, &'a Value)> = entries.collect();
    sorted.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(b.0)));

    let mut map = Vec::with_capacity(sorted.len());
    for (key, value) in sorted {
        cursor.push(Segment::Key(key.as_str()));
        map.push((CborValue::Text(key.clone()), to_cbor(value, cursor)?));
        cursor.pop();
    }

    cursor.ascend();
    Ok(CborValue::Map(map))
}
