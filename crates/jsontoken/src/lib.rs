//! Incremental, push-driven JSON tokenization with precise path tracking.
//!
//! Characters go in one at a time, in chunks of any size. Out come
//! [`TokenEvent`]s: each a [`Token`] paired with the [`JsonPath`] of the value
//! it belongs to. Two grammars are available through [`TokenizerOptions`]:
//! strict RFC JSON, and a lenient superset that accepts comments, single
//! quotes, unquoted names and values, `=`/`=>` separators, implicit nulls
//! and multiple top-level documents.
//!
//! [`Tokenizer`] is the synchronous core. [`TokenStream`] wraps it with a
//! [`CharSource`] and delivers events to a [`TokenSink`] under consumer
//! demand, or one at a time through [`Iterator`].
//!
//! ```rust
//! use jsontoken::{Token, TokenizerOptions, path, tokenize};
//!
//! let events: Vec<_> = tokenize(r#"{"a":[1,true]}"#, TokenizerOptions::strict())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(events[3].token, Token::Number("1".into()));
//! assert_eq!(events[3].path, path!["a", 0]);
//! assert_eq!(events[4].path, path!["a", 1]);
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod error;
mod escape_buffer;
mod options;
mod path;
mod source;
mod stream;
mod token;
mod tokenizer;

#[cfg(feature = "std")]
pub mod handoff;

#[cfg(test)]
mod tests;

pub use error::{StreamError, SyntaxError, SyntaxErrorKind};
pub use options::TokenizerOptions;
#[doc(hidden)]
pub use path::PathSegmentFrom;
pub use path::{JsonPath, PathParseError, PathSegment};
pub use source::{CharSource, ChunkSource, IterSource, Pull};
pub use stream::{Demand, Progress, TokenSink, TokenStream, tokenize};
pub use token::{Token, TokenEvent};
pub use tokenizer::{Status, Tokenizer};

#[doc(hidden)]
pub use alloc::vec;

/// Builds a [`JsonPath`] from a heterogeneous list of keys and indices. The
/// root segment is implied.
///
/// ```rust
/// use jsontoken::{JsonPath, PathSegment, path};
///
/// let p = path![0, "foo", 2];
/// assert_eq!(
///     p,
///     JsonPath::from_segments(vec![
///         PathSegment::Root,
///         PathSegment::Index(0),
///         PathSegment::Key("foo".into()),
///         PathSegment::Index(2),
///     ])
/// );
/// assert_eq!(path![], JsonPath::root());
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        #[allow(unused_imports)]
        use $crate::PathSegmentFrom;
        $crate::JsonPath::from_segments($crate::vec![
            $crate::PathSegment::Root,
            $($crate::PathSegment::from_path_segment($elem)),*
        ])
    }};
}
