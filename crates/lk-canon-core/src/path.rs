//! Traversal bookkeeping shared by the encoders: nesting depth and the
//! location of the node being visited, rendered only when an error is built.

use crate::error::CanonicalizationError;
use crate::value::integral_float;

/// Root marker for rendered paths
pub const ROOT: &str = "$";

pub(crate) enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Append `key` to a rendered path: `.key` for plain identifiers,
/// `["key"]` otherwise.
pub(crate) fn push_key(path: &mut String, key: &str) {
    let plain = !key.is_empty()
        && !key.starts_with(|c: char| c.is_ascii_digit())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        path.push('.');
        path.push_str(key);
    } else {
        path.push_str(&format!("[{key:?}]"));
    }
}

pub(crate) fn push_index(path: &mut String, index: usize) {
    path.push_str(&format!("[{index}]"));
}

/// Depth guard and path stack for one encoding pass.
pub(crate) struct Cursor<'a> {
    segments: Vec<Segment<'a>>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            segments: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Enter a container.
    pub(crate) fn descend(&mut self) -> Result<(), CanonicalizationError> {
        if self.depth >= self.max_depth {
            return Err(CanonicalizationError::DepthExceeded {
                limit: self.max_depth,
                path: self.render(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.depth -= 1;
    }

    pub(crate) fn push(&mut self, segment: Segment<'a>) {
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }

    /// Integer equal to `f`, or `NonIntegerNumber` at the current location.
    pub(crate) fn integral(&self, f: f64) -> Result<i128, CanonicalizationError> {
        integral_float(f).ok_or_else(|| CanonicalizationError::NonIntegerNumber {
            value: f,
            path: self.render(),
        })
    }

    pub(crate) fn unsupported(&self, type_name: impl Into<String>) -> CanonicalizationError {
        CanonicalizationError::UnsupportedType {
            type_name: type_name.into(),
            path: self.render(),
        }
    }

    pub(crate) fn render(&self) -> String {
        let mut path = String::from(ROOT);
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => push_key(&mut path, key),
                Segment::Index(index) => push_index(&mut path, *index),
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_path() {
        let mut cursor = Cursor::new(8);
        assert_eq!(cursor.render(), "$");

        cursor.push(Segment::Key("a"));
        cursor.push(Segment::Index(2));
        cursor.push(Segment::Key("z"));
        assert_eq!(cursor.render(), "$.a[2].z");

        cursor.pop();
        cursor.push(Segment::Key("two words"));
        assert_eq!(cursor.render(), "$.a[2][\"two words\"]");
    }

    #[test]
    fn test_depth_guard() {
        let mut cursor = Cursor::new(2);
        assert!(cursor.descend().is_ok());
        assert!(cursor.descend().is_ok());
        let err = cursor.descend().unwrap_err();
        assert_eq!(
            err,
            CanonicalizationError::DepthExceeded {
                limit: 2,
                path: "$".into()
            }
        );
        cursor.ascend();
        assert!(cursor.descend().is_ok());
    }
}
