//! JSONPath-style locators attached to every token.
//!
//! A [`JsonPath`] is an ordered list of [`PathSegment`]s starting at
//! [`PathSegment::Root`]. Paths render as JSONPath text:
//!
//! ```
//! use jsontoken::{JsonPath, path};
//!
//! let p = path!["store", 0, "a b"];
//! assert_eq!(p.to_string(), "$.store[0]['a b']");
//! assert_eq!("$.store[0]['a b']".parse::<JsonPath>().unwrap(), p);
//! ```
use alloc::{
    string::{String, ToString},
    sync::Arc,
    vec,
    vec::Vec,
};
use core::{fmt, str::FromStr};

use thiserror::Error;

/// One step of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// The document root, `$`.
    Root,
    /// An object member.
    Key(Arc<str>),
    /// An array element.
    Index(usize),
    /// Placeholder path carried by `DocumentEnd`, which has no location.
    Noop,
}

impl PathSegment {
    /// Returns the index if this segment is an array index.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        if let Self::Index(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Returns the key if this segment is an object key.
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        if let Self::Key(k) = self {
            Some(k)
        } else {
            None
        }
    }
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        Self::Key(s.into())
    }
}

impl From<String> for PathSegment {
    fn from(s: String) -> Self {
        Self::Key(s.into())
    }
}

impl From<Arc<str>> for PathSegment {
    fn from(s: Arc<str>) -> Self {
        Self::Key(s)
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

#[doc(hidden)]
pub trait PathSegmentFrom<T> {
    fn from_path_segment(value: T) -> PathSegment;
}

macro_rules! impl_integer_as_path_segment {
    ($($t:ty),+) => {
        $(
            impl PathSegmentFrom<$t> for PathSegment {
                fn from_path_segment(value: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    PathSegment::Index(value as usize)
                }
            }
        )+
    };
}
impl_integer_as_path_segment!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl PathSegmentFrom<&str> for PathSegment {
    fn from_path_segment(value: &str) -> Self {
        PathSegment::Key(value.into())
    }
}

impl PathSegmentFrom<String> for PathSegment {
    fn from_path_segment(value: String) -> Self {
        PathSegment::Key(value.into())
    }
}

/// A root-relative location in a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsonPath(Vec<PathSegment>);

impl JsonPath {
    /// The path of the document root, `$`.
    #[must_use]
    pub fn root() -> Self {
        Self(vec![PathSegment::Root])
    }

    /// The location-less path carried by `DocumentEnd`.
    #[must_use]
    pub fn noop() -> Self {
        Self(vec![PathSegment::Noop])
    }

    /// Wraps an explicit segment list without validating it.
    #[must_use]
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// The segments of this path, including the leading `Root`.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Whether this is the placeholder path of a `DocumentEnd`.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self.0.as_slice(), [PathSegment::Noop])
    }

    /// Number of key and index steps below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0
            .iter()
            .filter(|s| matches!(s, PathSegment::Key(_) | PathSegment::Index(_)))
            .count()
    }

    /// The last key or index step, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0
            .last()
            .filter(|s| matches!(s, PathSegment::Key(_) | PathSegment::Index(_)))
    }

    /// Parses JSONPath text of the form produced by `Display`.
    ///
    /// The empty string parses to [`JsonPath::noop`].
    ///
    /// # Errors
    ///
    /// Returns a [`PathParseError`] describing the first malformed position.
    pub fn parse(text: &str) -> Result<Self, PathParseError> {
        if text.is_empty() {
            return Ok(Self::noop());
        }
        let chars: Vec<char> = text.chars().collect();
        if chars[0] != '$' {
            return Err(PathParseError::MissingRoot);
        }
        let mut segments = vec![PathSegment::Root];
        let mut i = 1;
        while i < chars.len() {
            match chars[i] {
                '.' => {
                    let start = i + 1;
                    let mut end = start;
                    while end < chars.len() && chars[end] != '.' && chars[end] != '[' {
                        end += 1;
                    }
                    if end == start {
                        return Err(PathParseError::EmptyKey { offset: i });
                    }
                    let key: String = chars[start..end].iter().collect();
                    segments.push(PathSegment::Key(key.into()));
                    i = end;
                }
                '[' => {
                    let (segment, next) = parse_bracket(&chars, i)?;
                    segments.push(segment);
                    i = next;
                }
                ch => return Err(PathParseError::UnexpectedChar { ch, offset: i }),
            }
        }
        Ok(Self(segments))
    }
}

fn parse_bracket(chars: &[char], open: usize) -> Result<(PathSegment, usize), PathParseError> {
    let mut i = open + 1;
    match chars.get(i) {
        Some(&quote @ ('\'' | '"')) => {
            i += 1;
            let mut key = String::new();
            loop {
                match chars.get(i) {
                    None => return Err(PathParseError::Unterminated { offset: open }),
                    Some('\\') => {
                        let escaped = chars
                            .get(i + 1)
                            .ok_or(PathParseError::Unterminated { offset: open })?;
                        key.push(*escaped);
                        i += 2;
                    }
                    Some(&c) if c == quote => {
                        i += 1;
                        break;
                    }
                    Some(&c) => {
                        key.push(c);
                        i += 1;
                    }
                }
            }
            if chars.get(i) != Some(&']') {
                return Err(PathParseError::Unterminated { offset: open });
            }
            Ok((PathSegment::Key(key.into()), i + 1))
        }
        Some(_) => {
            let start = i;
            while i < chars.len() && chars[i] != ']' {
                i += 1;
            }
            if i == chars.len() {
                return Err(PathParseError::Unterminated { offset: open });
            }
            let digits: String = chars[start..i].iter().collect();
            let index = digits
                .parse::<usize>()
                .map_err(|_| PathParseError::InvalidIndex { offset: start })?;
            Ok((PathSegment::Index(index), i + 1))
        }
        None => Err(PathParseError::Unterminated { offset: open }),
    }
}

/// Reasons [`JsonPath::parse`] can reject its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathParseError {
    /// The text did not start with `$`.
    #[error("path must start with '$'")]
    MissingRoot,
    /// A `.` was not followed by a key.
    #[error("empty key at offset {offset}")]
    EmptyKey {
        /// Character offset of the `.`.
        offset: usize,
    },
    /// A `[` was not closed.
    #[error("unterminated bracket at offset {offset}")]
    Unterminated {
        /// Character offset of the `[`.
        offset: usize,
    },
    /// A bracketed index was not a non-negative integer.
    #[error("invalid index at offset {offset}")]
    InvalidIndex {
        /// Character offset of the index text.
        offset: usize,
    },
    /// A character that cannot start a segment.
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Its character offset.
        offset: usize,
    },
}

impl FromStr for JsonPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("$"),
            Self::Key(k) if is_identifier(k) => write!(f, ".{k}"),
            Self::Key(k) => {
                f.write_str("['")?;
                for c in k.chars() {
                    if c == '\'' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    fmt::Write::write_char(f, c)?;
                }
                f.write_str("']")
            }
            Self::Index(i) => write!(f, "[{i}]"),
            Self::Noop => Ok(()),
        }
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            fmt::Display::fmt(segment, f)?;
        }
        Ok(())
    }
}

impl Default for JsonPath {
    fn default() -> Self {
        Self::root()
    }
}

impl From<JsonPath> for String {
    fn from(path: JsonPath) -> Self {
        path.to_string()
    }
}

// Paths travel as their JSONPath text, e.g. `"$.a[0]"`.
#[cfg(any(test, feature = "serde"))]
mod serde_impls {
    use alloc::string::ToString;
    use core::fmt;

    use serde::{
        Deserialize, Deserializer, Serialize, Serializer,
        de::{Error, Visitor},
    };

    use super::JsonPath;

    impl Serialize for JsonPath {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&self.to_string())
        }
    }

    struct JsonPathVisitor;

    impl Visitor<'_> for JsonPathVisitor {
        type Value = JsonPath;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a JSONPath string such as \"$.a[0]\"")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            JsonPath::parse(value).map_err(E::custom)
        }
    }

    impl<'de> Deserialize<'de> for JsonPath {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_str(JsonPathVisitor)
        }
    }
}
