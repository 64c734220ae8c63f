//! Tokens and the events that pair them with a location.
use alloc::string::String;
use core::fmt::{self, Write};

use crate::path::JsonPath;

/// One lexical unit of a JSON document.
///
/// Scalars keep their source text: numbers are never converted, so precision
/// is preserved, and strings are already unescaped.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// An object member name.
    Name(String),
    /// A string value.
    String(String),
    /// A numeric literal exactly as written.
    Number(String),
    /// `true` or `false`.
    Boolean(bool),
    /// `null`.
    Null,
    /// Marks the end of one top-level value.
    DocumentEnd,
}

impl Token {
    /// The text this token stands for, without quoting.
    ///
    /// ```
    /// use jsontoken::Token;
    ///
    /// assert_eq!(Token::ArrayStart.lexeme(), "[");
    /// assert_eq!(Token::Number("1e3".into()).lexeme(), "1e3");
    /// assert_eq!(Token::DocumentEnd.lexeme(), "");
    /// ```
    #[must_use]
    pub fn lexeme(&self) -> &str {
        match self {
            Self::ObjectStart => "{",
            Self::ObjectEnd => "}",
            Self::ArrayStart => "[",
            Self::ArrayEnd => "]",
            Self::Name(s) | Self::String(s) | Self::Number(s) => s,
            Self::Boolean(true) => "true",
            Self::Boolean(false) => "false",
            Self::Null => "null",
            Self::DocumentEnd => "",
        }
    }

    /// Whether this token opens or closes a container.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::ObjectStart | Self::ObjectEnd | Self::ArrayStart | Self::ArrayEnd
        )
    }

    /// Whether this token is a complete scalar value.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::String(_) | Self::Number(_) | Self::Boolean(_) | Self::Null
        )
    }
}

pub(crate) fn write_escaped<W: Write>(s: &str, f: &mut W) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0C}' => f.write_str("\\f")?,
            c if c < ' ' => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

impl fmt::Display for Token {
    /// Renders the token as a JSON fragment; names and strings are quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(s) | Self::String(s) => write_escaped(s, f),
            other => f.write_str(other.lexeme()),
        }
    }
}

/// A token together with where it occurred.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenEvent {
    /// The token.
    pub token: Token,
    /// Its location; `DocumentEnd` carries [`JsonPath::noop`].
    pub path: JsonPath,
}

impl TokenEvent {
    /// Pairs a token with its location.
    #[must_use]
    pub fn new(token: Token, path: JsonPath) -> Self {
        Self { token, path }
    }
}

impl fmt::Display for TokenEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_noop() {
            write!(f, "{:?}", self.token)
        } else {
            write!(f, "{} {:?}", self.path, self.token)
        }
    }
}
