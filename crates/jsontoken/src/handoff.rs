//! Moving characters from a producer thread to the thread that tokenizes.
//!
//! [`channel`] returns a [`CharSender`] for the producer and a
//! [`ChannelSource`] that plugs into a [`TokenStream`](crate::TokenStream).
//! One mutex guards the queue; characters arrive in the order they were sent.
//!
//! ```rust
//! use std::thread;
//!
//! use jsontoken::{TokenStream, TokenizerOptions, handoff};
//!
//! let (tx, rx) = handoff::channel::<()>();
//! let producer = thread::spawn(move || {
//!     tx.send_str("[1,");
//!     tx.send_str("2]");
//!     tx.close();
//! });
//!
//! let mut stream = TokenStream::new(rx, TokenizerOptions::strict());
//! let mut events = Vec::new();
//! while !stream.is_terminated() {
//!     stream.source_mut().wait_ready();
//!     for event in stream.by_ref() {
//!         events.push(event.unwrap());
//!     }
//! }
//! producer.join().unwrap();
//! assert_eq!(events.len(), 5);
//! ```
use std::{
    collections::VecDeque,
    sync::{
        Arc, Condvar, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use tracing::debug;

use crate::source::{CharSource, Pull};

#[derive(Debug)]
struct State<E> {
    queue: VecDeque<char>,
    closed: bool,
    failure: Option<E>,
}

#[derive(Debug)]
struct Shared<E> {
    state: Mutex<State<E>>,
    ready: Condvar,
    cancelled: AtomicBool,
}

impl<E> Shared<E> {
    fn lock(&self) -> MutexGuard<'_, State<E>> {
        // Critical sections are single pushes, pops or flag writes.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Creates a connected sender and source.
#[must_use]
pub fn channel<E>() -> (CharSender<E>, ChannelSource<E>) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            queue: VecDeque::new(),
            closed: false,
            failure: None,
        }),
        ready: Condvar::new(),
        cancelled: AtomicBool::new(false),
    });
    (
        CharSender {
            shared: Arc::clone(&shared),
        },
        ChannelSource { shared },
    )
}

/// Producer half of [`channel`]. Dropping it closes the input.
#[derive(Debug)]
pub struct CharSender<E> {
    shared: Arc<Shared<E>>,
}

impl<E> CharSender<E> {
    /// Sends one character. Returns `false` if the input was already closed
    /// or failed, or the consumer cancelled.
    pub fn send(&self, c: char) -> bool {
        self.push(|queue| queue.push_back(c))
    }

    /// Sends every character of `text`, in order, as one batch.
    pub fn send_str(&self, text: &str) -> bool {
        self.push(|queue| queue.extend(text.chars()))
    }

    fn push(&self, f: impl FnOnce(&mut VecDeque<char>)) -> bool {
        if self.is_cancelled() {
            return false;
        }
        let mut state = self.shared.lock();
        if state.closed || state.failure.is_some() {
            return false;
        }
        f(&mut state.queue);
        drop(state);
        self.shared.ready.notify_all();
        true
    }

    /// Ends the input after the characters already sent.
    pub fn close(&self) {
        self.shared.lock().closed = true;
        self.shared.ready.notify_all();
    }

    /// Fails the input after the characters already sent.
    pub fn fail(&self, error: E) {
        let mut state = self.shared.lock();
        if !state.closed && state.failure.is_none() {
            state.failure = Some(error);
        }
        drop(state);
        self.shared.ready.notify_all();
    }

    /// Whether the consumer cancelled; producers should stop sending.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }
}

impl<E> Drop for CharSender<E> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Consumer half of [`channel`].
#[derive(Debug)]
pub struct ChannelSource<E> {
    shared: Arc<Shared<E>>,
}

impl<E> ChannelSource<E> {
    /// Blocks until a character, end of input, or a failure is available.
    pub fn wait_ready(&self) {
        let state = self.shared.lock();
        let _ready = self
            .shared
            .ready
            .wait_while(state, |s| {
                s.queue.is_empty()
                    && !s.closed
                    && s.failure.is_none()
                    && !self.shared.cancelled.load(Ordering::Acquire)
            })
            .unwrap_or_else(PoisonError::into_inner);
    }
}

impl<E> CharSource for ChannelSource<E> {
    type Error = E;

    fn pull(&mut self) -> Pull<E> {
        if self.shared.cancelled.load(Ordering::Acquire) {
            return Pull::End;
        }
        let mut state = self.shared.lock();
        if let Some(c) = state.queue.pop_front() {
            return Pull::Char(c);
        }
        if let Some(error) = state.failure.take() {
            state.closed = true;
            return Pull::Failed(error);
        }
        if state.closed { Pull::End } else { Pull::Pending }
    }

    fn is_exhausted(&mut self) -> bool {
        if self.shared.cancelled.load(Ordering::Acquire) {
            return true;
        }
        let state = self.shared.lock();
        state.closed && state.queue.is_empty() && state.failure.is_none()
    }

    fn cancel(&mut self) {
        debug!("handoff cancelled by consumer");
        self.shared.cancelled.store(true, Ordering::Release);
        self.shared.lock().queue.clear();
        self.shared.ready.notify_all();
    }
}
