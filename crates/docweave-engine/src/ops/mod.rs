//! # Edit Operations
//!
//! The output side of the converter: a closed set of edit operations addressed
//! by absolute offset, and the append-only [`OperationSequence`] that collects
//! them in replay order.
//!
//! ## Modules
//!
//! - **`wire`**: serde types for the remote `batchUpdate` request body
//! - **`invariants`**: checks a finished sequence for offset bookkeeping errors
//!
//! ## Ordering
//!
//! Operations are never reordered. A styling operation may only reference a
//! range whose text was inserted earlier in the same sequence; the sequence
//! tracks the position just past the last insertion and refuses anything beyond it.

pub mod invariants;
pub mod wire;

use serde::{Deserialize, Serialize};

use crate::markup::HeadingLevel;

pub use invariants::{InvariantViolation, check as check_invariants};
pub use wire::{BatchUpdate, Request, WireError};

/// Unit in which document offsets are counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexUnit {
    /// UTF-16 code units, the unit remote rich-text documents index by.
    #[default]
    Utf16,
    /// Unicode scalar values.
    Chars,
}

impl IndexUnit {
    pub fn measure(self, text: &str) -> usize {
        match self {
            IndexUnit::Utf16 => text.encode_utf16().count(),
            IndexUnit::Chars => text.chars().count(),
        }
    }
}

/// A non-empty `[start, end)` span of document offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    start: usize,
    end: usize,
}

impl TextRange {
    /// Returns `None` for degenerate (`start >= end`) spans.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false: degenerate ranges cannot be constructed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Smallest range spanning both `self` and `other`.
    pub fn cover(self, other: TextRange) -> TextRange {
        TextRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Where this range ends up after `len` units are inserted at `at`.
    pub(crate) fn shift_for_insert(self, at: usize, len: usize) -> TextRange {
        if self.start >= at {
            TextRange {
                start: self.start + len,
                end: self.end + len,
            }
        } else if self.end > at {
            TextRange {
                start: self.start,
                end: self.end + len,
            }
        } else {
            self
        }
    }
}

/// Character-level attributes applied by `SetTextStyle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterStyle {
    pub bold: bool,
    pub link: Option<String>,
}

impl CharacterStyle {
    pub fn bold() -> Self {
        Self {
            bold: true,
            link: None,
        }
    }

    pub fn link(url: &str) -> Self {
        Self {
            bold: false,
            link: Some(url.to_string()),
        }
    }
}

/// Named paragraph style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedStyle {
    Heading(HeadingLevel),
    Normal,
}

impl NamedStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamedStyle::Heading(HeadingLevel::H1) => "HEADING_1",
            NamedStyle::Heading(HeadingLevel::H2) => "HEADING_2",
            NamedStyle::Heading(HeadingLevel::H3) => "HEADING_3",
            NamedStyle::Heading(HeadingLevel::H4) => "HEADING_4",
            NamedStyle::Normal => "NORMAL_TEXT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "HEADING_1" => Some(NamedStyle::Heading(HeadingLevel::H1)),
            "HEADING_2" => Some(NamedStyle::Heading(HeadingLevel::H2)),
            "HEADING_3" => Some(NamedStyle::Heading(HeadingLevel::H3)),
            "HEADING_4" => Some(NamedStyle::Heading(HeadingLevel::H4)),
            "NORMAL_TEXT" => Some(NamedStyle::Normal),
            _ => None,
        }
    }
}

/// List bullet preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletPreset {
    /// Disc / circle / square glyphs.
    Disc,
    /// Decimal / alpha / roman numbering.
    Numbered,
}

impl BulletPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulletPreset::Disc => "BULLET_DISC_CIRCLE_SQUARE",
            BulletPreset::Numbered => "NUMBERED_DECIMAL_ALPHA_ROMAN",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "BULLET_DISC_CIRCLE_SQUARE" => Some(BulletPreset::Disc),
            "NUMBERED_DECIMAL_ALPHA_ROMAN" => Some(BulletPreset::Numbered),
            _ => None,
        }
    }
}

/// One edit against the remote document. Creation order is replay order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    InsertText { index: usize, text: String },
    SetTextStyle { range: TextRange, style: CharacterStyle },
    SetParagraphStyle { range: TextRange, style: NamedStyle },
    SetListBullets { range: TextRange, preset: BulletPreset },
}

impl EditOperation {
    /// The range a styling operation refers to; `None` for insertions.
    pub fn range(&self) -> Option<TextRange> {
        match self {
            EditOperation::InsertText { .. } => None,
            EditOperation::SetTextStyle { range, .. }
            | EditOperation::SetParagraphStyle { range, .. }
            | EditOperation::SetListBullets { range, .. } => Some(*range),
        }
    }
}

/// The append-only operation list produced by one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSequence {
    start_index: usize,
    end_index: usize,
    unit: IndexUnit,
    tab_id: Option<String>,
    ops: Vec<EditOperation>,
}

impl OperationSequence {
    pub fn new(start_index: usize, tab_id: Option<String>, unit: IndexUnit) -> Self {
        Self {
            start_index,
            end_index: start_index,
            unit,
            tab_id,
            ops: Vec::new(),
        }
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Offset just past the last inserted character.
    pub fn end_index(&self) -> usize {
        self.end_index
    }

    pub fn unit(&self) -> IndexUnit {
        self.unit
    }

    pub fn tab_id(&self) -> Option<&str> {
        self.tab_id.as_deref()
    }

    pub fn operations(&self) -> &[EditOperation] {
        &self.ops
    }

    pub fn into_operations(self) -> Vec<EditOperation> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Everything the remote document gains, in insertion order.
    pub fn plain_text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                EditOperation::InsertText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Records an insertion. Only the insertion engine calls this, with a range
    /// starting at the current end.
    pub(crate) fn push_insert(&mut self, range: TextRange, text: String) {
        debug_assert_eq!(range.start(), self.end_index, "insertion detached from end");
        self.end_index = range.end();
        self.ops.push(EditOperation::InsertText {
            index: range.start(),
            text,
        });
    }

    pub fn set_text_style(&mut self, range: TextRange, style: CharacterStyle) {
        if self.accepts(range) {
            self.ops.push(EditOperation::SetTextStyle { range, style });
        }
    }

    pub fn set_paragraph_style(&mut self, range: TextRange, style: NamedStyle) {
        if self.accepts(range) {
            self.ops.push(EditOperation::SetParagraphStyle { range, style });
        }
    }

    pub fn set_list_bullets(&mut self, range: TextRange, preset: BulletPreset) {
        if self.accepts(range) {
            self.ops.push(EditOperation::SetListBullets { range, preset });
        }
    }

    fn accepts(&self, range: TextRange) -> bool {
        let produced = range.start() >= self.start_index && range.end() <= self.end_index;
        debug_assert!(
            produced,
            "styling range {range:?} outside inserted span {}..{}",
            self.start_index, self.end_index
        );
        if !produced {
            log::warn!(
                "dropping styling for {}..{}: text not inserted yet (inserted span {}..{})",
                range.start(),
                range.end(),
                self.start_index,
                self.end_index
            );
        }
        produced
    }
}
