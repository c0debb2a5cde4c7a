//! Bump Allocator for Edge Labels
//!
//! Eliminates per-edge allocations by storing all label text in a single
//! contiguous buffer. Labels are referenced by (offset, length) spans.
//!
//! ## Memory Layout
//!
//! ```text
//! Arena Buffer: [flower power][chart][ 123]...[free space]
//!               ^   ^   ^      ^
//!               |   |   |      |
//! Spans:    (0,4) (4,8) |    (12,5) ...
//!                     (4,2)
//! ```
//!
//! Splitting an edge splits its span in place: `"flower power"` at 4
//! becomes `"flow"` (0,4) and `"er power"` (4,8) over the same bytes. Only
//! brand-new leaf labels append to the buffer, so the buffer never holds
//! more bytes than the inserted terms did.
//!
//! ## Performance
//!
//! - Allocation: O(1) - just bump pointer
//! - Split: O(1) - no copying
//! - Retrieval: O(1) - slice from buffer
//! - Memory overhead: 6 bytes per edge (u32 offset + u16 len)

/// Label reference - 6 bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    offset: u32,
    len: u16,
}

impl Span {
    /// Creates a new label span.
    #[inline(always)]
    pub const fn new(offset: u32, len: u16) -> Self {
        Self { offset, len }
    }

    /// Returns the byte offset in the arena.
    #[inline(always)]
    pub const fn offset(self) -> usize {
        self.offset as usize
    }

    /// Returns the byte length.
    #[inline(always)]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    /// Returns true if the span covers no bytes.
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Splits the span into `[0, at)` and `[at, len)`.
    ///
    /// `at` must lie on a char boundary of the labelled text.
    #[inline(always)]
    pub fn split_at(self, at: usize) -> (Span, Span) {
        debug_assert!(at <= self.len());
        let at = at as u16;
        (
            Span::new(self.offset, at),
            Span::new(self.offset + at as u32, self.len - at),
        )
    }
}

/// Bump allocator for edge label text.
pub struct LabelArena {
    /// Contiguous storage buffer
    buffer: String,
}

impl Default for LabelArena {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelArena {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self::with_capacity(64 * 1024) // 64KB initial
    }

    /// Creates a new arena with pre-allocated capacity.
    pub fn with_capacity(buffer_cap: usize) -> Self {
        Self {
            buffer: String::with_capacity(buffer_cap),
        }
    }

    /// Returns the number of bytes stored.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no labels are stored.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clears all labels (resets bump pointer but keeps capacity).
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Appends a label to the arena.
    ///
    /// # Errors
    ///
    /// Returns `None` if the label length exceeds u16::MAX (65535 bytes) or
    /// the buffer would grow past what a u32 offset can address.
    #[inline]
    pub fn push(&mut self, text: &str) -> Option<Span> {
        let len = text.len();
        if len > u16::MAX as usize {
            return None;
        }

        let offset = self.buffer.len();
        if offset + len > u32::MAX as usize {
            return None;
        }

        // Grow by 1.5x rather than the default doubling
        if offset + len > self.buffer.capacity() {
            let new_cap = (self.buffer.capacity() * 3 / 2).max(offset + len).max(4096);
            self.buffer.reserve(new_cap - offset);
        }

        self.buffer.push_str(text);
        Some(Span::new(offset as u32, len as u16))
    }

    /// Gets the text of a label.
    #[inline(always)]
    pub fn get(&self, span: Span) -> &str {
        let start = span.offset();
        &self.buffer[start..start + span.len()]
    }
}
