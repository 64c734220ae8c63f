//! Stripping of `//`, `#` and `/* */` comments in the lenient grammar.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum CommentState {
    #[default]
    Idle,
    /// Saw `/`; the next character decides whether a comment starts.
    MaybeStart,
    Line,
    Block,
    /// Saw `*` inside a block comment.
    MaybeEndBlock,
}

/// What the dispatcher should do with a character after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Filtered {
    /// Not comment text; dispatch it.
    Pass,
    /// Swallowed by the filter.
    Consumed,
    /// A held `/` did not open a comment. Dispatch `/` first, then this
    /// character without filtering it again.
    ReplaySlash,
}

#[derive(Debug, Default)]
pub(crate) struct CommentFilter {
    state: CommentState,
}

impl CommentFilter {
    /// Classifies `c`. Comments cannot start inside a quoted string.
    pub fn filter(&mut self, c: char, in_string: bool) -> Filtered {
        use CommentState::*;

        match self.state {
            Line => {
                // The terminating newline belongs to the comment.
                if c == '\n' {
                    self.state = Idle;
                }
                Filtered::Consumed
            }
            Block => {
                if c == '*' {
                    self.state = MaybeEndBlock;
                }
                Filtered::Consumed
            }
            MaybeEndBlock => {
                self.state = match c {
                    '/' => Idle,
                    '*' => MaybeEndBlock,
                    _ => Block,
                };
                Filtered::Consumed
            }
            MaybeStart => match c {
                '/' => {
                    self.state = Line;
                    Filtered::Consumed
                }
                '*' => {
                    self.state = Block;
                    Filtered::Consumed
                }
                _ => {
                    self.state = Idle;
                    Filtered::ReplaySlash
                }
            },
            Idle if in_string => Filtered::Pass,
            Idle => match c {
                '#' => {
                    self.state = Line;
                    Filtered::Consumed
                }
                '/' => {
                    self.state = MaybeStart;
                    Filtered::Consumed
                }
                _ => Filtered::Pass,
            },
        }
    }

    /// A `/` is held waiting for its successor.
    pub fn pending_slash(&self) -> bool {
        self.state == CommentState::MaybeStart
    }

    pub fn reset(&mut self) {
        self.state = CommentState::Idle;
    }
}
