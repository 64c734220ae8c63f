//! Error types reported by the tokenizer and the streaming coordinator.

use thiserror::Error;

use crate::path::JsonPath;

/// The grammar violation a [`SyntaxError`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SyntaxErrorKind {
    /// A value was required, e.g. after `,` in an array or `:` in an object.
    #[error("Expected value")]
    ExpectedValue,
    /// A name was not followed by `:` (or `=` when lenient).
    #[error("Expected object separator")]
    ExpectedObjectSeparator,
    /// A value inside a container was not followed by `,` or a closing bracket.
    #[error("Expected list separator")]
    ExpectedListSeparator,
    /// An object member did not start with a name.
    #[error("Expected name")]
    ExpectedName,
    /// A scalar could not be interpreted under the active grammar.
    #[error("Invalid value")]
    InvalidValue,
    /// A `\u` escape contained a non-hexadecimal character.
    #[error("Invalid unicode escape sequence")]
    InvalidUnicodeEscape,
    /// A bare token pending at end of input could not be interpreted.
    #[error("Invalid bare token")]
    InvalidBareToken,
    /// The input ended right after a `/` that might have opened a comment.
    #[error("Unexpected trailing slash")]
    UnexpectedTrailingSlash,
    /// Strict mode saw a second top-level value.
    #[error("Unexpected data after document completed")]
    TrailingData,
    /// Strict mode reached end of input before any value.
    #[error("Empty JSON")]
    EmptyDocument,
    /// End of input arrived while the grammar still expected the given input.
    #[error("Expected {0}")]
    Expected(&'static str),
}

/// A malformed-input error with the position it was detected at.
///
/// `line` and `column` are 1-based and point at the offending character.
/// `path` is the locator of the innermost entered container at that point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line} column {column} path {path}")]
pub struct SyntaxError {
    /// What went wrong.
    pub kind: SyntaxErrorKind,
    /// 1-based line of the offending character.
    pub line: usize,
    /// 1-based column of the offending character.
    pub column: usize,
    /// Location in the document when the error was raised.
    pub path: JsonPath,
}

/// Terminal failure delivered to a [`TokenSink`](crate::TokenSink).
///
/// `E` is the error type of the character source; in-memory sources use
/// [`Infallible`](core::convert::Infallible).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError<E> {
    /// The input was not valid under the active grammar.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The character source reported a failure.
    #[error("upstream failure: {0}")]
    Upstream(E),
}

impl<E> StreamError<E> {
    /// Returns the syntax error, if this failure was detected by the tokenizer.
    #[must_use]
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Self::Syntax(err) => Some(err),
            Self::Upstream(_) => None,
        }
    }
}
