//! Quoted-string scanning: delimiter tracking and escape decoding.
use super::buffer::ScanBuffer;
use crate::escape_buffer::{SurrogateJoiner, UnicodeEscapeBuffer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Escape {
    #[default]
    None,
    /// Saw `\`.
    Backslash,
    /// Inside the hex digits of `\u`.
    Unicode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringStep {
    Continue,
    /// The closing delimiter was consumed.
    Close,
    /// A non-hex character appeared in a `\u` escape.
    InvalidEscape,
}

#[derive(Debug)]
pub(crate) struct StringScan {
    delimiter: char,
    escape: Escape,
    unicode: UnicodeEscapeBuffer,
    joiner: SurrogateJoiner,
}

impl Default for StringScan {
    fn default() -> Self {
        Self {
            delimiter: '"',
            escape: Escape::None,
            unicode: UnicodeEscapeBuffer::new(),
            joiner: SurrogateJoiner::default(),
        }
    }
}

/// Characters produced by a single-character escape. Unknown escapes
/// stand for themselves, and `\` followed by a newline continues the line.
fn unescape(c: char) -> char {
    match c {
        't' => '\t',
        'b' => '\u{08}',
        'n' => '\n',
        'r' => '\r',
        'f' => '\u{0C}',
        other => other,
    }
}

impl StringScan {
    /// Prepares for a string opened by `delimiter`.
    pub fn begin(&mut self, delimiter: char) {
        *self = Self {
            delimiter,
            ..Self::default()
        };
    }

    /// Consumes one character of string content, appending decoded text to
    /// `buf`.
    pub fn step(&mut self, c: char, buf: &mut ScanBuffer) -> StringStep {
        match self.escape {
            Escape::Backslash => {
                if c == 'u' {
                    self.escape = Escape::Unicode;
                    self.unicode.reset();
                } else {
                    self.escape = Escape::None;
                    self.joiner.flush(|ch| buf.push(ch));
                    buf.push(unescape(c));
                }
                StringStep::Continue
            }
            Escape::Unicode => match self.unicode.feed(c) {
                Ok(Some(unit)) => {
                    self.escape = Escape::None;
                    self.joiner.push_unit(unit, |ch| buf.push(ch));
                    StringStep::Continue
                }
                Ok(None) => StringStep::Continue,
                Err(_) => StringStep::InvalidEscape,
            },
            Escape::None if c == '\\' => {
                self.escape = Escape::Backslash;
                StringStep::Continue
            }
            Escape::None => {
                self.joiner.flush(|ch| buf.push(ch));
                if c == self.delimiter {
                    StringStep::Close
                } else {
                    buf.push(c);
                    StringStep::Continue
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    /// Scans `body` (everything after the opening quote) and returns the
    /// decoded text if the string closed.
    fn scan(delimiter: char, body: &str) -> Result<String, StringStep> {
        let mut scan = StringScan::default();
        scan.begin(delimiter);
        let mut buf = ScanBuffer::default();
        for c in body.chars() {
            match scan.step(c, &mut buf) {
                StringStep::Continue => {}
                StringStep::Close => return Ok(buf.take()),
                err @ StringStep::InvalidEscape => return Err(err),
            }
        }
        Err(StringStep::Continue)
    }

    #[test]
    fn simple_escapes() {
        assert_eq!(
            scan('"', r#"a\tb\nc\"d\\e\/f\'g""#).unwrap(),
            "a\tb\nc\"d\\e/f'g"
        );
        assert_eq!(scan('"', "\\b\\f\\r\"").unwrap(), "\u{08}\u{0C}\r");
    }

    #[test]
    fn line_continuation() {
        assert_eq!(scan('"', "a\\\nb\"").unwrap(), "a\nb");
    }

    #[test]
    fn raw_control_characters_are_content() {
        assert_eq!(scan('"', "x\ny\r\n\"").unwrap(), "x\ny\r\n");
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(scan('"', "\\u0041\\u00e9\"").unwrap(), "A\u{e9}");
        assert_eq!(scan('"', "\\uD83D\\uDE00\"").unwrap(), "\u{1F600}");
        assert_eq!(scan('"', "\\uD83Dx\"").unwrap(), "\u{FFFD}x");
    }

    #[test]
    fn invalid_unicode_escape() {
        assert_eq!(scan('"', "\\u00G0\""), Err(StringStep::InvalidEscape));
    }

    #[test]
    fn single_quote_delimiter() {
        assert_eq!(scan('\'', "say \"hi\"'").unwrap(), "say \"hi\"");
    }

    #[test]
    fn unterminated_string_stays_open() {
        assert_eq!(scan('"', "abc"), Err(StringStep::Continue));
    }
}
