use crate::ops::{IndexUnit, OperationSequence, TextRange};

use super::ConvertOptions;
use super::normalize::normalize_line_endings;

/// The next insertion offset in the target document.
///
/// Only moves forward, and only by the measured length of inserted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
}

impl Cursor {
    /// Creates a cursor at `index`. Offset 0 is reserved by the remote document.
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Returns the current absolute offset.
    pub fn pos(&self) -> usize {
        self.index
    }

    fn advance(&mut self, n: usize) {
        self.index += n;
    }
}

/// Owns the cursor and routes every insertion through it.
///
/// Styling requests go to the accumulator via [`InsertionEngine::styles`]
/// using the ranges this engine hands back, never computed offsets.
pub struct InsertionEngine {
    cursor: Cursor,
    unit: IndexUnit,
    out: OperationSequence,
}

impl InsertionEngine {
    pub fn new(options: &ConvertOptions) -> Self {
        let start = options.effective_start_index();
        Self {
            cursor: Cursor::new(start),
            unit: options.index_unit,
            out: OperationSequence::new(start, options.tab_id.clone(), options.index_unit),
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.pos()
    }

    /// Length of `text` in the configured index unit.
    pub fn measure(&self, text: &str) -> usize {
        self.unit.measure(text)
    }

    /// Inserts `text` at the cursor and advances past it.
    ///
    /// Empty text is a no-op and yields no range.
    pub fn insert(&mut self, text: &str) -> Option<TextRange> {
        if text.is_empty() {
            return None;
        }
        let text = normalize_line_endings(text);
        let start = self.cursor.pos();
        let Some(end) = start.checked_add(self.measure(&text)) else {
            log::warn!("insert at {start} overflows the offset space, skipping");
            return None;
        };
        let range = TextRange::new(start, end)?;
        log::trace!("insert {}..{} {:?}", range.start(), range.end(), text);

        self.out.push_insert(range, text);
        self.cursor.advance(range.len());
        Some(range)
    }

    /// Inserts a single space between two visible inline runs.
    ///
    /// `previous_visible` is false before the first run of a block, so no
    /// leading space is ever produced.
    pub fn insert_separator_if_needed(&mut self, previous_visible: bool) -> Option<TextRange> {
        if previous_visible {
            self.insert(" ")
        } else {
            None
        }
    }

    pub fn styles(&mut self) -> &mut OperationSequence {
        &mut self.out
    }

    pub fn finish(self) -> OperationSequence {
        debug_assert_eq!(self.cursor.pos(), self.out.end_index());
        self.out
    }
}
