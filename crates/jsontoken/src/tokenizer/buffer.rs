//! Accumulation of the text of the scalar currently being scanned.
use alloc::string::String;

const WINDOW: usize = 64;

/// A fixed window of characters backed by a growable overflow string.
///
/// Appends land in the window; when it is full its contents move to the
/// overflow in one `extend`, so arbitrarily long tokens cost amortized O(1)
/// per character.
#[derive(Debug)]
pub(crate) struct ScanBuffer {
    window: [char; WINDOW],
    len: usize,
    overflow: String,
}

impl Default for ScanBuffer {
    fn default() -> Self {
        Self {
            window: ['\0'; WINDOW],
            len: 0,
            overflow: String::new(),
        }
    }
}

impl ScanBuffer {
    pub fn push(&mut self, c: char) {
        if self.len == WINDOW {
            self.spill();
        }
        self.window[self.len] = c;
        self.len += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0 && self.overflow.is_empty()
    }

    fn spill(&mut self) {
        self.overflow.extend(&self.window[..self.len]);
        self.len = 0;
    }

    /// Returns the accumulated text and leaves the buffer empty.
    pub fn take(&mut self) -> String {
        self.spill();
        core::mem::take(&mut self.overflow)
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.overflow.clear();
    }
}
