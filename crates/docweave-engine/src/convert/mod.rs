//! # Markup to Edit Operations
//!
//! Compiles a markup tree into the ordered edit operations that rebuild it in
//! a remote document addressed by absolute offset.
//!
//! ## Pipeline
//!
//! ```text
//! MarkupNode --Block::classify--> dispatch --compile_runs--> InsertionEngine --> OperationSequence
//!                                    |                              ^
//!                                    +------- normalize_text -------+
//! ```
//!
//! ## Modules
//!
//! - **`normalize`**: whitespace collapsing and line-ending folding
//! - **`cursor`**: `Cursor` and the `InsertionEngine` that alone advances it
//! - **`inline`**: inline runs (plain, bold, link) inside paragraphs and list items
//! - **`blocks`**: the closed `Block` set and its handlers
//!
//! ## Key Invariants
//!
//! - The cursor only moves by the measured length of inserted text
//! - Styling ranges come from the insertion that produced the text, never
//!   from recomputed offsets, and are appended straight after that insertion
//! - Empty content produces no operations at all
//!
//! Each call owns a fresh cursor and sequence, so conversions for different
//! targets can run in parallel. Two batches for the same tab must be applied
//! one after the other: each assumes it owns the index space from its start.

pub mod blocks;
pub mod cursor;
pub mod inline;
pub mod normalize;

use crate::markup::{self, MarkupNode};
use crate::ops::{IndexUnit, OperationSequence};

pub use blocks::{Block, dispatch};
pub use cursor::{Cursor, InsertionEngine};
pub use inline::{InlineRun, compile_runs};
pub use normalize::normalize_text;

/// Offset 0 of a remote document body is reserved.
pub const DEFAULT_START_INDEX: usize = 1;

/// Caller-supplied placement of a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Offset the first insertion lands on.
    pub start_index: usize,
    /// Tab (document section) attached to every operation.
    pub tab_id: Option<String>,
    pub index_unit: IndexUnit,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            start_index: DEFAULT_START_INDEX,
            tab_id: None,
            index_unit: IndexUnit::default(),
        }
    }
}

impl ConvertOptions {
    pub(crate) fn effective_start_index(&self) -> usize {
        if self.start_index == 0 {
            log::warn!("start index 0 is reserved, using {DEFAULT_START_INDEX}");
            return DEFAULT_START_INDEX;
        }
        self.start_index
    }
}

/// Converts the body of `root` (or `root` itself when it has no body).
pub fn convert(root: &MarkupNode, options: &ConvertOptions) -> OperationSequence {
    let body = root.body().unwrap_or(root);
    let mut engine = InsertionEngine::new(options);

    for child in body.children() {
        dispatch(&mut engine, Block::classify(child));
    }

    let seq = engine.finish();
    log::debug!(
        "converted {} operations covering {}..{}",
        seq.len(),
        seq.start_index(),
        seq.end_index()
    );
    seq
}

pub fn convert_html(input: &str, options: &ConvertOptions) -> OperationSequence {
    convert(&markup::parse_html(input), options)
}

pub fn convert_markdown(input: &str, options: &ConvertOptions) -> OperationSequence {
    convert(&markup::parse_markdown(input), options)
}
