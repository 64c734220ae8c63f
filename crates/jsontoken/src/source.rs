//! Character sources the [`TokenStream`](crate::TokenStream) pulls from.
use alloc::{collections::VecDeque, string::String};
use core::{convert::Infallible, iter::Peekable};

/// Outcome of asking a [`CharSource`] for its next character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pull<E> {
    /// The next character.
    Char(char),
    /// Nothing is available yet; more may arrive later.
    Pending,
    /// The input is complete.
    End,
    /// The input failed. No further characters will arrive.
    Failed(E),
}

/// A pull-driven supply of characters.
pub trait CharSource {
    /// Failure reported through [`Pull::Failed`].
    type Error;

    /// Returns the next character or the reason there is none.
    fn pull(&mut self) -> Pull<Self::Error>;

    /// Whether the next `pull` would return [`Pull::End`].
    ///
    /// Lets the stream complete without being granted demand for a pull.
    /// Must not consume anything. Sources that cannot tell return `false`.
    fn is_exhausted(&mut self) -> bool {
        false
    }

    /// The consumer is no longer interested. Implementations release what
    /// they hold; `pull` is not called again.
    fn cancel(&mut self) {}
}

/// Adapts any character iterator. Exhaustion is end of input.
///
/// The iterator is peeked to detect its end, so it may be advanced one
/// character ahead of what has been pulled.
#[derive(Debug, Clone)]
pub struct IterSource<I: Iterator<Item = char>> {
    chars: Option<Peekable<I>>,
}

impl<I: Iterator<Item = char>> IterSource<I> {
    /// Wraps `chars`.
    pub fn new(chars: I) -> Self {
        Self {
            chars: Some(chars.peekable()),
        }
    }
}

impl<'a> From<&'a str> for IterSource<core::str::Chars<'a>> {
    fn from(s: &'a str) -> Self {
        Self::new(s.chars())
    }
}

impl<I: Iterator<Item = char>> CharSource for IterSource<I> {
    type Error = Infallible;

    fn pull(&mut self) -> Pull<Infallible> {
        match self.chars.as_mut().and_then(Iterator::next) {
            Some(c) => Pull::Char(c),
            None => Pull::End,
        }
    }

    fn is_exhausted(&mut self) -> bool {
        self.chars.as_mut().is_none_or(|chars| chars.peek().is_none())
    }

    fn cancel(&mut self) {
        self.chars = None;
    }
}

/// A source fed by pushing text as it arrives.
///
/// While open and empty it reports [`Pull::Pending`]. Pushed characters are
/// always delivered before a later [`close`](Self::close) or
/// [`fail`](Self::fail) takes effect.
///
/// ```
/// use jsontoken::{ChunkSource, CharSource, Pull};
///
/// let mut source = ChunkSource::<()>::new();
/// source.push_str("[1");
/// assert_eq!(source.pull(), Pull::Char('['));
/// assert_eq!(source.pull(), Pull::Char('1'));
/// assert_eq!(source.pull(), Pull::Pending);
/// source.close();
/// assert_eq!(source.pull(), Pull::End);
/// ```
#[derive(Debug)]
pub struct ChunkSource<E = Infallible> {
    queue: VecDeque<char>,
    closed: bool,
    failure: Option<E>,
    cancelled: bool,
}

impl<E> Default for ChunkSource<E> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            closed: false,
            failure: None,
            cancelled: false,
        }
    }
}

impl<E> ChunkSource<E> {
    /// An open, empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text`. Ignored after `close`, `fail` or cancellation.
    pub fn push_str(&mut self, text: &str) {
        if self.accepting() {
            self.queue.extend(text.chars());
        }
    }

    /// Appends the characters of an owned chunk.
    pub fn push_string(&mut self, text: String) {
        self.push_str(&text);
    }

    /// Marks the input complete once the buffered characters drain.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Marks the input failed once the buffered characters drain.
    pub fn fail(&mut self, error: E) {
        if self.accepting() {
            self.failure = Some(error);
        }
    }

    /// Whether the consumer cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Number of characters waiting to be pulled.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.queue.len()
    }

    fn accepting(&self) -> bool {
        !self.closed && !self.cancelled && self.failure.is_none()
    }
}

impl<E> CharSource for ChunkSource<E> {
    type Error = E;

    fn pull(&mut self) -> Pull<E> {
        if self.cancelled {
            return Pull::End;
        }
        if let Some(c) = self.queue.pop_front() {
            return Pull::Char(c);
        }
        if let Some(error) = self.failure.take() {
            self.closed = true;
            return Pull::Failed(error);
        }
        if self.closed { Pull::End } else { Pull::Pending }
    }

    fn is_exhausted(&mut self) -> bool {
        self.cancelled || (self.closed && self.queue.is_empty() && self.failure.is_none())
    }

    fn cancel(&mut self) {
        self.cancelled = true;
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iter_source_ends_when_exhausted() {
        let mut source = IterSource::from("ab");
        assert_eq!(source.pull(), Pull::Char('a'));
        assert_eq!(source.pull(), Pull::Char('b'));
        assert_eq!(source.pull(), Pull::End);
    }

    #[test]
    fn iter_source_reports_exhaustion_without_pulling() {
        let mut source = IterSource::from("a");
        assert!(!source.is_exhausted());
        assert_eq!(source.pull(), Pull::Char('a'));
        assert!(source.is_exhausted());
        assert_eq!(source.pull(), Pull::End);
    }

    #[test]
    fn chunk_source_is_exhausted_once_closed_and_drained() {
        let mut source = ChunkSource::<&str>::new();
        assert!(!source.is_exhausted());
        source.push_str("a");
        source.close();
        assert!(!source.is_exhausted());
        assert_eq!(source.pull(), Pull::Char('a'));
        assert!(source.is_exhausted());

        let mut failing = ChunkSource::<&str>::new();
        failing.fail("boom");
        assert!(!failing.is_exhausted());
    }

    #[test]
    fn iter_source_cancel_stops_delivery() {
        let mut source = IterSource::from("ab");
        source.cancel();
        assert_eq!(source.pull(), Pull::End);
    }

    #[test]
    fn chunk_source_delivers_before_failure() {
        let mut source = ChunkSource::<&str>::new();
        source.push_str("x");
        source.fail("boom");
        source.push_str("ignored");
        assert_eq!(source.pull(), Pull::Char('x'));
        assert_eq!(source.pull(), Pull::Failed("boom"));
        assert_eq!(source.pull(), Pull::End);
    }

    #[test]
    fn chunk_source_cancel_clears_buffer() {
        let mut source = ChunkSource::<Infallible>::new();
        source.push_string("abc".into());
        source.cancel();
        assert!(source.is_cancelled());
        assert_eq!(source.buffered(), 0);
        assert_eq!(source.pull(), Pull::End);
    }
}
