//! Decoding of `\uXXXX` escapes inside quoted strings.
//!
//! [`UnicodeEscapeBuffer`] accumulates exactly four hexadecimal digits and
//! yields the UTF-16 code unit they spell. [`SurrogateJoiner`] pairs those code
//! units into `char`s: a high surrogate immediately followed by a low surrogate
//! escape becomes one supplementary character, and any unpaired surrogate
//! becomes U+FFFD.

/// Buffer for the four hexadecimal digits of one `\u` escape.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    code: u16,
    len: u8,
}

/// A non-hexadecimal character arrived inside a `\u` escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InvalidHexDigit;

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.code = 0;
        self.len = 0;
    }

    /// Feeds one digit. Returns the code unit once the fourth digit arrives,
    /// after which the buffer is ready for the next escape.
    pub fn feed(&mut self, c: char) -> Result<Option<u16>, InvalidHexDigit> {
        let digit = c.to_digit(16).ok_or(InvalidHexDigit)?;
        #[allow(clippy::cast_possible_truncation)]
        let digit = digit as u16;
        self.code = (self.code << 4) | digit;
        self.len += 1;
        if self.len == 4 {
            let code = self.code;
            self.reset();
            Ok(Some(code))
        } else {
            Ok(None)
        }
    }
}

/// Joins UTF-16 code units from consecutive escapes into `char`s.
#[derive(Debug, Default)]
pub(crate) struct SurrogateJoiner {
    high: Option<u16>,
}

impl SurrogateJoiner {
    /// Accepts the code unit of a completed escape and pushes whatever
    /// characters it resolves into `out`.
    pub fn push_unit(&mut self, unit: u16, mut out: impl FnMut(char)) {
        match unit {
            0xD800..=0xDBFF => {
                if self.high.replace(unit).is_some() {
                    out(char::REPLACEMENT_CHARACTER);
                }
            }
            0xDC00..=0xDFFF => match self.high.take() {
                Some(high) => {
                    let scalar =
                        0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                    out(char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                None => out(char::REPLACEMENT_CHARACTER),
            },
            _ => {
                self.flush(&mut out);
                out(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
    }

    /// Resolves a dangling high surrogate. Called before any character that is
    /// not part of a `\u` escape.
    pub fn flush(&mut self, mut out: impl FnMut(char)) {
        if self.high.take().is_some() {
            out(char::REPLACEMENT_CHARACTER);
        }
    }
}
