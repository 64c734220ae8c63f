//! Demand-driven delivery of token events.
//!
//! [`TokenStream`] couples a [`CharSource`] with a [`Tokenizer`] and delivers
//! events to a [`TokenSink`] only as far as the sink has granted demand. A
//! single loop does all the work: a sink granting more demand from inside
//! [`TokenSink::on_event`] does not re-enter the stream, its grant is picked
//! up by the loop that is already running.
//!
//! ```rust
//! use jsontoken::{Demand, StreamError, TokenEvent, TokenSink, TokenizerOptions, tokenize};
//! use core::convert::Infallible;
//!
//! #[derive(Default)]
//! struct Collect(Vec<TokenEvent>, bool);
//!
//! impl TokenSink<Infallible> for Collect {
//!     fn on_event(&mut self, event: TokenEvent, demand: &mut Demand) {
//!         self.0.push(event);
//!         demand.request(1);
//!     }
//!     fn on_complete(&mut self) {
//!         self.1 = true;
//!     }
//!     fn on_error(&mut self, _: StreamError<Infallible>) {}
//! }
//!
//! let mut stream = tokenize("[1,2]", TokenizerOptions::strict());
//! let mut sink = Collect::default();
//! stream.request(1, &mut sink);
//! assert_eq!(sink.0.len(), 5);
//! assert!(sink.1);
//! ```
use tracing::{debug, trace};

use crate::{
    error::StreamError,
    options::TokenizerOptions,
    source::{CharSource, IterSource, Pull},
    token::TokenEvent,
    tokenizer::Tokenizer,
};

/// Receives the output of a [`TokenStream`].
///
/// At most one of `on_complete` and `on_error` is called, at most once, and
/// never before every event queued ahead of it has been delivered.
pub trait TokenSink<E> {
    /// Receives one event. `demand` may be used to grant more or to cancel.
    fn on_event(&mut self, event: TokenEvent, demand: &mut Demand);

    /// The input ended and was well formed.
    fn on_complete(&mut self);

    /// The input was malformed or the source failed.
    fn on_error(&mut self, error: StreamError<E>);
}

/// Flow-control handle passed to [`TokenSink::on_event`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Demand {
    granted: u64,
    cancelled: bool,
}

impl Demand {
    /// Allows `n` more events to be delivered.
    pub fn request(&mut self, n: u64) {
        self.granted = self.granted.saturating_add(n);
    }

    /// Stops the stream after this event. No terminal signal follows.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// Why [`TokenStream::drive`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Outstanding demand is zero.
    Blocked,
    /// The source has no character available right now.
    Starved,
    /// The terminal signal was delivered, or the stream was cancelled.
    Finished,
}

enum Step<E> {
    Event(TokenEvent),
    Terminal(Result<(), StreamError<E>>),
    Blocked,
    Starved,
    Finished,
    /// State changed; look again.
    Continue,
}

/// Emission and backpressure coordinator over a character source.
pub struct TokenStream<S: CharSource> {
    source: S,
    tokenizer: Tokenizer,
    demand: u64,
    outcome: Option<Result<(), StreamError<S::Error>>>,
    finished: bool,
    cancelled: bool,
}

impl<S: CharSource> core::fmt::Debug for TokenStream<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenStream")
            .field("tokenizer", &self.tokenizer)
            .field("demand", &self.demand)
            .field("finished", &self.finished)
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}

impl<S: CharSource> TokenStream<S> {
    /// Creates a stream that has not pulled anything yet.
    pub fn new(source: S, options: TokenizerOptions) -> Self {
        Self {
            source,
            tokenizer: Tokenizer::new(options),
            demand: 0,
            outcome: None,
            finished: false,
            cancelled: false,
        }
    }

    /// Grants `n` more events and makes as much progress as that allows.
    pub fn request(&mut self, n: u64, sink: &mut impl TokenSink<S::Error>) -> Progress {
        self.demand = self.demand.saturating_add(n);
        trace!(n, demand = self.demand, "request");
        self.drive(sink)
    }

    /// Makes progress with the demand already granted, e.g. after the source
    /// received more characters.
    pub fn drive(&mut self, sink: &mut impl TokenSink<S::Error>) -> Progress {
        loop {
            match self.step() {
                Step::Event(event) => {
                    let mut grant = Demand::default();
                    sink.on_event(event, &mut grant);
                    self.demand = self.demand.saturating_add(grant.granted);
                    if grant.cancelled {
                        self.cancel();
                    }
                }
                Step::Terminal(Ok(())) => {
                    sink.on_complete();
                    return Progress::Finished;
                }
                Step::Terminal(Err(err)) => {
                    sink.on_error(err);
                    return Progress::Finished;
                }
                Step::Blocked => return Progress::Blocked,
                Step::Starved => return Progress::Starved,
                Step::Finished => return Progress::Finished,
                Step::Continue => {}
            }
        }
    }

    /// Stops the stream: the source is cancelled and in-flight state is
    /// dropped. Nothing further reaches the sink.
    pub fn cancel(&mut self) {
        if self.finished || self.cancelled {
            return;
        }
        debug!("token stream cancelled");
        self.cancelled = true;
        self.outcome = None;
        self.tokenizer.discard();
        self.source.cancel();
    }

    /// Whether any character has been consumed.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.tokenizer.status() != crate::Status::NotStarted
    }

    /// Whether the terminal signal was delivered or the stream was cancelled.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.finished || self.cancelled
    }

    /// Demand granted but not yet used.
    #[must_use]
    pub fn outstanding_demand(&self) -> u64 {
        self.demand
    }

    /// The underlying source, e.g. to push more text into a
    /// [`ChunkSource`](crate::ChunkSource).
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// The underlying tokenizer.
    #[must_use]
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    fn step(&mut self) -> Step<S::Error> {
        if self.finished || self.cancelled {
            return Step::Finished;
        }
        if self.tokenizer.pending_events() > 0 {
            if self.demand == 0 {
                return Step::Blocked;
            }
            if let Some(event) = self.tokenizer.pop_event() {
                self.demand -= 1;
                return Step::Event(event);
            }
        }
        if let Some(outcome) = self.outcome.take() {
            self.finished = true;
            return Step::Terminal(outcome);
        }
        if self.demand == 0 {
            // End of input needs no demand, only a drained queue.
            if self.source.is_exhausted() {
                self.finish_input();
                return Step::Continue;
            }
            return Step::Blocked;
        }
        self.pump()
    }

    fn finish_input(&mut self) {
        self.outcome = Some(self.tokenizer.finish().map_err(StreamError::from));
    }

    /// Pulls characters until one of them queues an event or ends the input.
    fn pump(&mut self) -> Step<S::Error> {
        loop {
            match self.source.pull() {
                Pull::Char(c) => {
                    if let Err(err) = self.tokenizer.feed(c) {
                        self.source.cancel();
                        self.outcome = Some(Err(err.into()));
                        return Step::Continue;
                    }
                    if self.tokenizer.pending_events() > 0 {
                        return Step::Continue;
                    }
                }
                Pull::Pending => return Step::Starved,
                Pull::End => {
                    self.finish_input();
                    return Step::Continue;
                }
                Pull::Failed(err) => {
                    self.tokenizer.fail();
                    self.outcome = Some(Err(StreamError::Upstream(err)));
                    return Step::Continue;
                }
            }
        }
    }
}

/// Pulls one event at a time: each call grants one unit of demand.
///
/// Returns `None` when the source is starved, on successful completion, or
/// after the error has been yielded, so a push-fed stream can be drained with
/// `by_ref()` and resumed after more input arrives.
impl<S: CharSource> Iterator for TokenStream<S> {
    type Item = Result<TokenEvent, StreamError<S::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.demand = self.demand.max(1);
        loop {
            match self.step() {
                Step::Event(event) => return Some(Ok(event)),
                Step::Terminal(Err(err)) => return Some(Err(err)),
                Step::Terminal(Ok(())) | Step::Blocked | Step::Starved | Step::Finished => {
                    return None;
                }
                Step::Continue => {}
            }
        }
    }
}

/// Tokenizes a complete string.
///
/// ```rust
/// use jsontoken::{Token, TokenizerOptions, tokenize};
///
/// let tokens: Vec<Token> = tokenize("[true,,true]", TokenizerOptions::lenient())
///     .map(|event| event.unwrap().token)
///     .collect();
/// assert_eq!(
///     tokens,
///     [
///         Token::ArrayStart,
///         Token::Boolean(true),
///         Token::Null,
///         Token::Boolean(true),
///         Token::ArrayEnd,
///         Token::DocumentEnd,
///     ]
/// );
/// ```
#[must_use]
pub fn tokenize(input: &str, options: TokenizerOptions) -> TokenStream<IterSource<core::str::Chars<'_>>> {
    TokenStream::new(IterSource::from(input), options)
}
