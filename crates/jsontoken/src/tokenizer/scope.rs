//! The nesting stack and the path entries that travel with it.
use alloc::{sync::Arc, vec, vec::Vec};

use crate::path::{JsonPath, PathSegment};

/// Grammar context at one nesting depth. The top of the stack selects the
/// handler for the next character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    EmptyDocument,
    NonemptyDocument,
    EmptyArray,
    NonemptyArray,
    EmptyObject,
    NonemptyObject,
    /// A name was read; its separator or value is pending.
    DanglingName,
    BareValue,
    Number,
    QuotedString,
}

#[derive(Debug, Clone, Default)]
enum PathEntry {
    #[default]
    Unset,
    Key(Arc<str>),
    Index(usize),
}

#[derive(Debug, Clone)]
struct Frame {
    scope: Scope,
    entry: PathEntry,
}

impl Frame {
    fn new(scope: Scope) -> Self {
        Self {
            scope,
            entry: PathEntry::Unset,
        }
    }
}

/// Never empty: the bottom frame is the document scope.
#[derive(Debug, Clone)]
pub(crate) struct ScopeStack {
    frames: Vec<Frame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self {
            frames: vec![Frame::new(Scope::EmptyDocument)],
        }
    }
}

impl ScopeStack {
    fn top(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    pub fn peek(&self) -> Scope {
        self.frames[self.frames.len() - 1].scope
    }

    pub fn parent(&self) -> Option<Scope> {
        let len = self.frames.len();
        (len > 1).then(|| self.frames[len - 2].scope)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn set_top(&mut self, scope: Scope) {
        self.top().scope = scope;
    }

    pub fn push(&mut self, scope: Scope) {
        self.frames.push(Frame::new(scope));
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Starts index tracking for a freshly pushed array.
    pub fn start_index(&mut self) {
        self.top().entry = PathEntry::Index(0);
    }

    pub fn increment_index(&mut self) {
        let frame = self.top();
        frame.entry = match frame.entry {
            PathEntry::Index(i) => PathEntry::Index(i + 1),
            _ => PathEntry::Index(0),
        };
    }

    /// Records the member name for the object one level below the top, which
    /// is where the name scan was started.
    pub fn set_key_below_top(&mut self, key: Arc<str>) {
        let len = self.frames.len();
        if len > 1 {
            self.frames[len - 2].entry = PathEntry::Key(key);
        }
    }

    /// The locator of the current position: the root followed by the entries
    /// of every depth that has already been entered.
    pub fn path(&self) -> JsonPath {
        let mut segments = Vec::with_capacity(self.frames.len());
        segments.push(PathSegment::Root);
        for frame in &self.frames {
            match (frame.scope, &frame.entry) {
                (Scope::NonemptyObject, PathEntry::Key(k)) => {
                    segments.push(PathSegment::Key(Arc::clone(k)));
                }
                (Scope::NonemptyArray, PathEntry::Index(i)) => {
                    segments.push(PathSegment::Index(*i));
                }
                _ => {}
            }
        }
        JsonPath::from_segments(segments)
    }
}
