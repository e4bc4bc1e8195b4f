//! # Replay Model
//!
//! An in-memory stand-in for the remote document, used to check what a batch
//! would do before it is submitted.
//!
//! The body is an xi-rope buffer that starts as the single terminal newline
//! every remote body carries. Document index `i` addresses rope position
//! `i - 1` (index 0 is reserved), measured in the sequence's [`IndexUnit`].
//! Insertions go through a rope `Delta`; styles and bullets are recorded as
//! spans and shifted when later text lands before or inside them.

use thiserror::Error;
use xi_rope::Rope;
use xi_rope::delta::Builder;

use crate::ops::{
    BulletPreset, CharacterStyle, EditOperation, IndexUnit, NamedStyle, TextRange,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("insert index {index} outside document body 1..={last}")]
    IndexOutOfBounds { index: usize, last: usize },

    #[error("range {start}..{end} outside document body 1..{body_end}")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        body_end: usize,
    },

    #[error("index {index} falls inside a surrogate pair")]
    SplitCharacter { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("operation {position}: {source}")]
pub struct ReplayFailure {
    pub position: usize,
    #[source]
    pub source: ReplayError,
}

#[derive(Debug, Clone)]
pub struct ReplayDocument {
    buffer: Rope,
    unit: IndexUnit,
    /// Body length in `unit`, terminal newline included.
    len: usize,
    text_styles: Vec<(TextRange, CharacterStyle)>,
    paragraph_styles: Vec<(TextRange, NamedStyle)>,
    bullets: Vec<(TextRange, BulletPreset)>,
}

impl ReplayDocument {
    pub fn new(unit: IndexUnit) -> Self {
        Self {
            buffer: Rope::from("\n"),
            unit,
            len: 1,
            text_styles: Vec::new(),
            paragraph_styles: Vec::new(),
            bullets: Vec::new(),
        }
    }

    /// A document whose body already holds `start_index - 1` empty paragraphs,
    /// so a batch converted for `start_index` lands where it expects.
    pub fn starting_at(unit: IndexUnit, start_index: usize) -> Self {
        let padding = start_index.saturating_sub(1);
        let mut doc = Self::new(unit);
        doc.buffer = Rope::from("\n".repeat(padding + 1));
        doc.len = padding + 1;
        doc
    }

    /// Index one past the terminal newline.
    pub fn body_end(&self) -> usize {
        1 + self.len
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Text covered by `range`, if it lies inside the body.
    pub fn slice(&self, range: TextRange) -> Option<String> {
        if range.start() < 1 {
            return None;
        }
        let start = self.byte_offset(range.start() - 1)?;
        let end = self.byte_offset(range.end() - 1)?;
        Some(self.buffer.slice_to_cow(start..end).into_owned())
    }

    pub fn text_styles(&self) -> &[(TextRange, CharacterStyle)] {
        &self.text_styles
    }

    pub fn paragraph_styles(&self) -> &[(TextRange, NamedStyle)] {
        &self.paragraph_styles
    }

    pub fn bullets(&self) -> &[(TextRange, BulletPreset)] {
        &self.bullets
    }

    pub fn apply(&mut self, op: &EditOperation) -> Result<(), ReplayError> {
        match op {
            EditOperation::InsertText { index, text } => self.insert(*index, text),
            EditOperation::SetTextStyle { range, style } => {
                self.check_range(*range)?;
                self.text_styles.push((*range, style.clone()));
                Ok(())
            }
            EditOperation::SetParagraphStyle { range, style } => {
                self.check_range(*range)?;
                self.paragraph_styles.push((*range, *style));
                Ok(())
            }
            EditOperation::SetListBullets { range, preset } => {
                self.check_range(*range)?;
                self.bullets.push((*range, *preset));
                Ok(())
            }
        }
    }

    /// Applies operations in order, stopping at the first failure.
    pub fn apply_all<'a>(
        &mut self,
        ops: impl IntoIterator<Item = &'a EditOperation>,
    ) -> Result<(), ReplayFailure> {
        for (position, op) in ops.into_iter().enumerate() {
            self.apply(op)
                .map_err(|source| ReplayFailure { position, source })?;
        }
        Ok(())
    }

    fn insert(&mut self, index: usize, text: &str) -> Result<(), ReplayError> {
        let last = self.body_end() - 1;
        if index < 1 || index > last {
            return Err(ReplayError::IndexOutOfBounds { index, last });
        }
        let at = self
            .byte_offset(index - 1)
            .ok_or(ReplayError::SplitCharacter { index })?;

        let mut builder = Builder::new(self.buffer.len());
        builder.replace(at..at, Rope::from(text));
        let delta = builder.build();
        self.buffer = delta.apply(&self.buffer);

        let len = self.unit.measure(text);
        self.len += len;
        for (range, _) in &mut self.text_styles {
            *range = range.shift_for_insert(index, len);
        }
        for (range, _) in &mut self.paragraph_styles {
            *range = range.shift_for_insert(index, len);
        }
        for (range, _) in &mut self.bullets {
            *range = range.shift_for_insert(index, len);
        }
        Ok(())
    }

    fn check_range(&self, range: TextRange) -> Result<(), ReplayError> {
        let body_end = self.body_end();
        if range.start() < 1 || range.end() > body_end {
            return Err(ReplayError::RangeOutOfBounds {
                start: range.start(),
                end: range.end(),
                body_end,
            });
        }
        Ok(())
    }

    /// Byte offset of the rope position `units` units from the start.
    fn byte_offset(&self, units: usize) -> Option<usize> {
        let text = self.buffer.slice_to_cow(0..self.buffer.len());
        let mut counted = 0;
        for (byte, ch) in text.char_indices() {
            if counted == units {
                return Some(byte);
            }
            counted += match self.unit {
                IndexUnit::Utf16 => ch.len_utf16(),
                IndexUnit::Chars => 1,
            };
            if counted > units {
                return None;
            }
        }
        (counted == units).then_some(text.len())
    }
}
