//! The per-character JSON grammar machine.
//!
//! [`Tokenizer`] accepts one character at a time and queues [`TokenEvent`]s as
//! values complete. It never looks ahead: every decision is made from the
//! current character and the state left by the previous ones, so input may be
//! split anywhere.
//!
//! ```rust
//! use jsontoken::{Token, Tokenizer, TokenizerOptions, path};
//!
//! let mut tokenizer = Tokenizer::new(TokenizerOptions::strict());
//! tokenizer.feed_str(r#"{"a":1234}"#).unwrap();
//! tokenizer.finish().unwrap();
//!
//! let events: Vec<_> = tokenizer.drain_events().collect();
//! assert_eq!(events[2].token, Token::Number("1234".into()));
//! assert_eq!(events[2].path, path!["a"]);
//! ```
#![allow(clippy::enum_glob_use)]

mod buffer;
mod comment;
mod number;
mod scope;
mod string;

use alloc::{collections::VecDeque, string::String, sync::Arc};

use tracing::{debug, trace};

use self::{
    buffer::ScanBuffer,
    comment::{CommentFilter, Filtered},
    number::{NumberState, is_number_start},
    scope::{Scope, ScopeStack},
    string::{StringScan, StringStep},
};
use crate::{
    error::{SyntaxError, SyntaxErrorKind},
    options::TokenizerOptions,
    path::JsonPath,
    token::{Token, TokenEvent},
};

const BOM: char = '\u{FEFF}';

/// Leading sequence some servers prepend to JSON to defeat script inclusion.
const NON_EXECUTE_PREFIX: [char; 5] = [')', ']', '}', '\'', '\n'];

/// Lifecycle of a [`Tokenizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// No character has been fed yet.
    NotStarted,
    /// Characters are being accepted.
    Started,
    /// End of input was reached and the input was well formed.
    Completed,
    /// A syntax error was detected or the source failed.
    Failed,
    /// The tokenizer was discarded before reaching a result.
    Cancelled,
}

impl Status {
    /// Whether further input is ignored.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

fn is_whitespace(c: char) -> bool {
    c <= ' '
}

fn is_control(c: char) -> bool {
    matches!(
        c,
        '\\' | '{' | '[' | ']' | '}' | ',' | ':' | ';' | '=' | '\'' | '"'
    )
}

/// Incremental JSON tokenizer.
///
/// Feed characters with [`feed`](Self::feed) or [`feed_str`](Self::feed_str),
/// signal end of input with [`finish`](Self::finish), and take completed
/// events with [`pop_event`](Self::pop_event). The first error is final:
/// afterwards every call is a no-op, but events queued before the error can
/// still be popped.
#[derive(Debug)]
pub struct Tokenizer {
    lenient: bool,
    stack: ScopeStack,
    buffer: ScanBuffer,
    number: NumberState,
    string: StringScan,
    comments: CommentFilter,
    /// A `,`, `;`, `:` or `=` was read and the element it introduces is
    /// pending.
    has_separator: bool,
    /// The pending separator was a lenient `=`, so a `>` may follow.
    arrow_allowed: bool,
    prefix_allowed: bool,
    prefix_matched: usize,
    first_char: bool,
    line: usize,
    column: usize,
    status: Status,
    events: VecDeque<TokenEvent>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerOptions::default())
    }
}

impl Tokenizer {
    /// Creates a tokenizer for one input stream.
    #[must_use]
    pub fn new(options: TokenizerOptions) -> Self {
        Self {
            lenient: options.lenient,
            stack: ScopeStack::default(),
            buffer: ScanBuffer::default(),
            number: NumberState::LeadingDigit,
            string: StringScan::default(),
            comments: CommentFilter::default(),
            has_separator: false,
            arrow_allowed: false,
            prefix_allowed: options.lenient,
            prefix_matched: 0,
            first_char: true,
            line: 0,
            column: 0,
            status: Status::NotStarted,
            events: VecDeque::new(),
        }
    }

    /// The options this tokenizer was created with.
    #[must_use]
    pub fn options(&self) -> TokenizerOptions {
        TokenizerOptions {
            lenient: self.lenient,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// 1-based line and column of the next character to be fed.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.line + 1, self.column + 1)
    }

    /// Number of queued events.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Takes the oldest queued event.
    pub fn pop_event(&mut self) -> Option<TokenEvent> {
        self.events.pop_front()
    }

    /// Takes every queued event in order.
    pub fn drain_events(&mut self) -> impl Iterator<Item = TokenEvent> + '_ {
        self.events.drain(..)
    }

    /// Processes one character.
    ///
    /// # Errors
    ///
    /// Returns the syntax error `c` caused. The tokenizer is then
    /// [`Failed`](Status::Failed) and ignores further input.
    pub fn feed(&mut self, c: char) -> Result<(), SyntaxError> {
        if self.status.is_terminal() {
            return Ok(());
        }
        self.status = Status::Started;
        let skip_bom = self.first_char && c == BOM;
        let result = if skip_bom { Ok(()) } else { self.accept(c) };

        // Position is advanced after processing so errors point at `c`.
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else if !skip_bom {
            self.column += 1;
        }
        self.first_char = false;

        result.inspect_err(|err| self.fail_with(err))
    }

    /// Processes every character of `text`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// See [`feed`](Self::feed).
    pub fn feed_str(&mut self, text: &str) -> Result<(), SyntaxError> {
        text.chars().try_for_each(|c| self.feed(c))
    }

    /// Signals end of input, flushing a pending bare value or number.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is incomplete, or, in strict mode,
    /// empty.
    pub fn finish(&mut self) -> Result<(), SyntaxError> {
        if self.status.is_terminal() {
            return Ok(());
        }
        match self.complete() {
            Ok(()) => {
                self.status = Status::Completed;
                debug!(line = self.line + 1, column = self.column + 1, "tokenizer completed");
                Ok(())
            }
            Err(err) => {
                self.fail_with(&err);
                Err(err)
            }
        }
    }

    /// Marks the input as failed upstream. Queued events stay available.
    pub fn fail(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        debug!("character source failed");
        self.status = Status::Failed;
        self.clear_scan_state();
    }

    /// Abandons the stream: scan state and queued events are dropped.
    pub fn discard(&mut self) {
        if !self.status.is_terminal() {
            debug!("tokenizer discarded");
            self.status = Status::Cancelled;
        }
        self.clear_scan_state();
        self.events.clear();
    }

    fn fail_with(&mut self, err: &SyntaxError) {
        debug!(%err, "tokenizer failed");
        self.status = Status::Failed;
        self.clear_scan_state();
    }

    fn clear_scan_state(&mut self) {
        self.buffer.clear();
        self.comments.reset();
    }

    fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError {
            kind,
            line: self.line + 1,
            column: self.column + 1,
            path: self.stack.path(),
        }
    }

    fn emit(&mut self, token: Token) {
        let path = self.stack.path();
        self.emit_at(token, path);
    }

    fn emit_at(&mut self, token: Token, path: JsonPath) {
        trace!(?token, %path, "emit");
        self.events.push_back(TokenEvent { token, path });
    }

    fn accept(&mut self, c: char) -> Result<(), SyntaxError> {
        if self.lenient {
            let in_string = self.stack.peek() == Scope::QuotedString;
            match self.comments.filter(c, in_string) {
                Filtered::Consumed => return Ok(()),
                Filtered::ReplaySlash => self.dispatch('/')?,
                Filtered::Pass => {}
            }
        }
        self.dispatch(c)
    }

    fn dispatch(&mut self, c: char) -> Result<(), SyntaxError> {
        use Scope::*;

        trace!(?c, scope = ?self.stack.peek(), depth = self.stack.depth(), "dispatch");
        match self.stack.peek() {
            EmptyDocument => self.on_empty_document(c),
            NonemptyDocument => self.on_nonempty_document(c),
            EmptyArray => self.on_empty_array(c),
            NonemptyArray => self.on_nonempty_array(c),
            EmptyObject => self.on_empty_object(c),
            NonemptyObject => self.on_nonempty_object(c),
            DanglingName => self.on_dangling_name(c),
            BareValue => self.on_bare_value(c),
            Number => self.on_number(c),
            QuotedString => self.on_string(c),
        }
    }

    /// Consumes `c` if it continues the non-execute prefix.
    fn match_prefix(&mut self, c: char) -> bool {
        if c == NON_EXECUTE_PREFIX[self.prefix_matched] {
            self.prefix_matched += 1;
            if self.prefix_matched == NON_EXECUTE_PREFIX.len() {
                trace!("skipped non-execute prefix");
                self.prefix_allowed = false;
                self.prefix_matched = 0;
            }
            return true;
        }
        if self.prefix_matched > 0 {
            // A partial prefix is dropped rather than reinterpreted.
            self.prefix_allowed = false;
            self.prefix_matched = 0;
        }
        false
    }

    fn on_empty_document(&mut self, c: char) -> Result<(), SyntaxError> {
        if self.prefix_allowed && self.match_prefix(c) {
            return Ok(());
        }
        if is_whitespace(c) {
            return Ok(());
        }
        self.prefix_allowed = false;
        match c {
            '{' => {
                self.start_object(Scope::NonemptyDocument);
                Ok(())
            }
            '[' => {
                self.start_array(Scope::NonemptyDocument);
                Ok(())
            }
            _ => self.start_simple_value(c, Scope::NonemptyDocument),
        }
    }

    fn on_nonempty_document(&mut self, c: char) -> Result<(), SyntaxError> {
        if is_whitespace(c) {
            Ok(())
        } else if self.lenient {
            self.on_empty_document(c)
        } else {
            Err(self.error(SyntaxErrorKind::TrailingData))
        }
    }

    fn on_empty_array(&mut self, c: char) -> Result<(), SyntaxError> {
        match c {
            ']' => {
                self.close_container(Token::ArrayEnd);
                Ok(())
            }
            c if is_whitespace(c) => Ok(()),
            '[' => {
                self.start_array(Scope::NonemptyArray);
                Ok(())
            }
            '{' => {
                self.start_object(Scope::NonemptyArray);
                Ok(())
            }
            ',' | ';' if self.lenient => {
                self.stack.set_top(Scope::NonemptyArray);
                self.has_separator = true;
                self.emit(Token::Null);
                self.stack.increment_index();
                Ok(())
            }
            '}' | ':' | '=' | ',' | ';' => Err(self.error(SyntaxErrorKind::ExpectedValue)),
            _ => self.start_simple_value(c, Scope::NonemptyArray),
        }
    }

    fn on_nonempty_array(&mut self, c: char) -> Result<(), SyntaxError> {
        if is_whitespace(c) {
            return Ok(());
        }
        if self.has_separator {
            return match c {
                ',' | ';' if self.lenient => {
                    self.emit(Token::Null);
                    self.stack.increment_index();
                    Ok(())
                }
                ']' if self.lenient => {
                    self.has_separator = false;
                    self.emit(Token::Null);
                    self.close_container(Token::ArrayEnd);
                    Ok(())
                }
                '[' => {
                    self.start_array(Scope::NonemptyArray);
                    Ok(())
                }
                '{' => {
                    self.start_object(Scope::NonemptyArray);
                    Ok(())
                }
                '}' | ']' | ':' | '=' | ',' | ';' => {
                    Err(self.error(SyntaxErrorKind::ExpectedValue))
                }
                _ => {
                    self.has_separator = false;
                    self.start_simple_value(c, Scope::NonemptyArray)
                }
            };
        }
        match c {
            ']' => {
                self.close_container(Token::ArrayEnd);
                Ok(())
            }
            ',' => {
                self.has_separator = true;
                self.stack.increment_index();
                Ok(())
            }
            ';' if self.lenient => {
                self.has_separator = true;
                self.stack.increment_index();
                Ok(())
            }
            _ => Err(self.error(SyntaxErrorKind::ExpectedListSeparator)),
        }
    }

    fn on_empty_object(&mut self, c: char) -> Result<(), SyntaxError> {
        match c {
            c if is_whitespace(c) => Ok(()),
            '}' => {
                self.close_container(Token::ObjectEnd);
                Ok(())
            }
            '{' | '[' | ']' | ':' | '=' | ',' | ';' => {
                Err(self.error(SyntaxErrorKind::ExpectedName))
            }
            _ => self.start_name(c),
        }
    }

    fn on_nonempty_object(&mut self, c: char) -> Result<(), SyntaxError> {
        if is_whitespace(c) {
            return Ok(());
        }
        if self.has_separator {
            if c != '"' && c != '\'' && is_control(c) {
                return Err(self.error(SyntaxErrorKind::ExpectedName));
            }
            self.start_name(c)?;
            self.has_separator = false;
            return Ok(());
        }
        match c {
            '}' => {
                self.close_container(Token::ObjectEnd);
                Ok(())
            }
            ',' => {
                self.has_separator = true;
                Ok(())
            }
            ';' if self.lenient => {
                self.has_separator = true;
                Ok(())
            }
            _ => Err(self.error(SyntaxErrorKind::ExpectedListSeparator)),
        }
    }

    fn on_dangling_name(&mut self, c: char) -> Result<(), SyntaxError> {
        if is_whitespace(c) {
            self.arrow_allowed = false;
            return Ok(());
        }
        if self.has_separator {
            if self.arrow_allowed && c == '>' {
                self.arrow_allowed = false;
                return Ok(());
            }
            self.arrow_allowed = false;
            match c {
                '[' => self.start_array(Scope::NonemptyObject),
                '{' => self.start_object(Scope::NonemptyObject),
                '}' | ']' | ':' | '=' | ',' | ';' => {
                    return Err(self.error(SyntaxErrorKind::ExpectedValue));
                }
                _ => self.start_simple_value(c, Scope::NonemptyObject)?,
            }
            self.has_separator = false;
            return Ok(());
        }
        match c {
            ':' => {
                self.has_separator = true;
                Ok(())
            }
            '=' if self.lenient => {
                self.has_separator = true;
                self.arrow_allowed = true;
                Ok(())
            }
            _ => Err(self.error(SyntaxErrorKind::ExpectedObjectSeparator)),
        }
    }

    fn on_bare_value(&mut self, c: char) -> Result<(), SyntaxError> {
        if is_whitespace(c) || is_control(c) {
            self.end_scalar_then(c)
        } else {
            self.buffer.push(c);
            Ok(())
        }
    }

    fn on_number(&mut self, c: char) -> Result<(), SyntaxError> {
        if is_whitespace(c) || is_control(c) {
            return self.end_scalar_then(c);
        }
        if let Some(next) = self.number.step(c) {
            self.number = next;
            self.buffer.push(c);
            Ok(())
        } else {
            // `1x`, `03` and the like continue as bare text.
            self.stack.set_top(Scope::BareValue);
            self.on_bare_value(c)
        }
    }

    fn on_string(&mut self, c: char) -> Result<(), SyntaxError> {
        match self.string.step(c, &mut self.buffer) {
            StringStep::Continue => Ok(()),
            StringStep::InvalidEscape => Err(self.error(SyntaxErrorKind::InvalidUnicodeEscape)),
            StringStep::Close => match self.take_scalar() {
                Some(token) => {
                    self.stack.pop();
                    self.emit(token);
                    self.maybe_end_document();
                    Ok(())
                }
                None => Err(self.error(SyntaxErrorKind::InvalidValue)),
            },
        }
    }

    /// Completes an unquoted scalar at its terminating character, then hands
    /// that character to the enclosing scope.
    fn end_scalar_then(&mut self, c: char) -> Result<(), SyntaxError> {
        let Some(token) = self.take_scalar() else {
            return Err(self.error(SyntaxErrorKind::InvalidValue));
        };
        self.stack.pop();
        self.emit(token);
        self.maybe_end_document();
        self.dispatch(c)
    }

    fn start_object(&mut self, entered: Scope) {
        self.has_separator = false;
        self.stack.set_top(entered);
        self.stack.push(Scope::EmptyObject);
        self.emit(Token::ObjectStart);
    }

    fn start_array(&mut self, entered: Scope) {
        self.has_separator = false;
        self.stack.set_top(entered);
        self.stack.push(Scope::EmptyArray);
        self.stack.start_index();
        self.emit(Token::ArrayStart);
    }

    fn start_name(&mut self, c: char) -> Result<(), SyntaxError> {
        if !self.lenient && c != '"' {
            return Err(self.error(SyntaxErrorKind::ExpectedName));
        }
        self.start_simple_value(c, Scope::DanglingName)
    }

    fn start_simple_value(&mut self, c: char, entered: Scope) -> Result<(), SyntaxError> {
        let scope = if c == '"' || (self.lenient && c == '\'') {
            self.string.begin(c);
            Scope::QuotedString
        } else if is_number_start(c) {
            self.number = NumberState::start(c);
            self.buffer.push(c);
            Scope::Number
        } else if is_control(c) {
            return Err(self.error(SyntaxErrorKind::InvalidValue));
        } else {
            self.buffer.push(c);
            Scope::BareValue
        };
        self.stack.set_top(entered);
        self.stack.push(scope);
        Ok(())
    }

    fn close_container(&mut self, token: Token) {
        self.stack.pop();
        self.emit(token);
        self.maybe_end_document();
    }

    fn maybe_end_document(&mut self) {
        if self.stack.peek() == Scope::NonemptyDocument {
            self.emit_at(Token::DocumentEnd, JsonPath::noop());
            if self.lenient {
                self.stack.set_top(Scope::EmptyDocument);
            }
        }
    }

    /// Interprets the buffered text of the scalar on top of the stack. The
    /// buffer is emptied either way; `None` means the text is not a valid
    /// token here.
    fn take_scalar(&mut self) -> Option<Token> {
        let scope = self.stack.peek();
        let parent = self.stack.parent();
        let text = self.buffer.take();

        if parent == Some(Scope::DanglingName) && (self.lenient || scope == Scope::QuotedString) {
            self.stack.set_key_below_top(Arc::from(text.as_str()));
            return Some(Token::Name(text));
        }
        // A top-level bare value starting with `/` is a half-recognised
        // comment and yields nothing.
        if parent == Some(Scope::NonemptyDocument) && scope == Scope::BareValue && text.starts_with('/')
        {
            return None;
        }
        if scope == Scope::Number && self.number.is_terminal() {
            return Some(Token::Number(text));
        }
        if scope == Scope::QuotedString {
            return Some(Token::String(text));
        }
        self.interpret_bare(text)
    }

    fn interpret_bare(&self, text: String) -> Option<Token> {
        if text.eq_ignore_ascii_case("true") {
            Some(Token::Boolean(true))
        } else if text.eq_ignore_ascii_case("false") {
            Some(Token::Boolean(false))
        } else if text.eq_ignore_ascii_case("null") {
            Some(Token::Null)
        } else if self.lenient && matches!(text.as_str(), "NaN" | "Infinity" | "-Infinity") {
            Some(Token::Number(text))
        } else if self.lenient {
            Some(Token::String(text))
        } else {
            None
        }
    }

    fn complete(&mut self) -> Result<(), SyntaxError> {
        if self.comments.pending_slash() {
            return Err(self.error(SyntaxErrorKind::UnexpectedTrailingSlash));
        }
        if matches!(self.stack.peek(), Scope::BareValue | Scope::Number) && !self.buffer.is_empty() {
            let Some(token) = self.take_scalar() else {
                return Err(self.error(SyntaxErrorKind::InvalidBareToken));
            };
            self.stack.pop();
            self.emit(token);
            self.maybe_end_document();
        }
        match self.stack.peek() {
            Scope::NonemptyDocument => Ok(()),
            Scope::EmptyDocument if self.lenient => Ok(()),
            Scope::EmptyDocument => Err(self.error(SyntaxErrorKind::EmptyDocument)),
            _ => Err(self.error(SyntaxErrorKind::Expected(self.expected()))),
        }
    }

    /// What the top scope is waiting for, for end-of-input diagnostics.
    fn expected(&self) -> &'static str {
        match self.stack.peek() {
            Scope::EmptyDocument => "any value",
            Scope::NonemptyDocument if self.lenient => "end of stream or any value",
            Scope::NonemptyDocument => "end of stream",
            Scope::EmptyArray => "any value or end of array",
            Scope::NonemptyArray if self.has_separator => "any value",
            Scope::NonemptyArray => "separator or end of array",
            Scope::EmptyObject => "any value or end of object",
            Scope::NonemptyObject if self.has_separator => "any value",
            Scope::NonemptyObject => "separator or end of object",
            Scope::DanglingName => "name-value separator",
            Scope::BareValue => "Any value",
            Scope::Number => "numeric value",
            Scope::QuotedString => "string data or close quote",
        }
    }
}
