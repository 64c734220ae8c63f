/// Grammar selection for a [`Tokenizer`](crate::Tokenizer).
///
/// The flag is fixed for the lifetime of a tokenizer.
///
/// # Lenient grammar
///
/// When `lenient` is `true` the tokenizer additionally accepts:
///
/// - single-quoted strings and names, and unquoted names and values,
/// - `=` and `=>` as name separators and `;` as a list separator,
/// - `//`, `#` and `/* ... */` comments,
/// - missing array elements, which are reported as `null`,
/// - `NaN`, `Infinity` and `-Infinity` as numbers,
/// - a leading `)]}'` non-execute prefix,
/// - several top-level values in one stream.
///
/// # Examples
///
/// ```rust
/// use jsontoken::{Tokenizer, TokenizerOptions};
///
/// let mut tokenizer = Tokenizer::new(TokenizerOptions::lenient());
/// tokenizer.feed_str("[1;2]").unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TokenizerOptions {
    /// Accept the extended grammar described above.
    ///
    /// # Default
    ///
    /// `false`
    pub lenient: bool,
}

impl TokenizerOptions {
    /// Options for the standard JSON grammar.
    #[must_use]
    pub const fn strict() -> Self {
        Self { lenient: false }
    }

    /// Options for the extended grammar.
    #[must_use]
    pub const fn lenient() -> Self {
        Self { lenient: true }
    }
}
