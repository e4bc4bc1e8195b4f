use thiserror::Error;

use super::{EditOperation, IndexUnit, OperationSequence};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("operation {position}: insert at {index} but cursor is at {cursor}")]
    DetachedInsert {
        position: usize,
        index: usize,
        cursor: usize,
    },

    #[error("operation {position}: empty insertion")]
    EmptyInsert { position: usize },

    #[error("operation {position}: range {start}..{end} references text not inserted yet (cursor {cursor})")]
    RangeAhead {
        position: usize,
        start: usize,
        end: usize,
        cursor: usize,
    },

    #[error("operation {position}: range {start}..{end} starts before the first offset {start_index}")]
    RangeBehind {
        position: usize,
        start: usize,
        end: usize,
        start_index: usize,
    },

    #[error("final cursor {actual} does not match start {start_index} plus inserted length {inserted}")]
    CursorMismatch {
        start_index: usize,
        inserted: usize,
        actual: usize,
    },
}

/// Checks the offset bookkeeping of a finished sequence.
pub fn check(seq: &OperationSequence) -> Result<(), InvariantViolation> {
    let cursor = check_operations(seq.start_index(), seq.unit(), seq.operations())?;
    if cursor != seq.end_index() {
        return Err(InvariantViolation::CursorMismatch {
            start_index: seq.start_index(),
            inserted: cursor - seq.start_index(),
            actual: seq.end_index(),
        });
    }
    Ok(())
}

/// Replays offsets over raw operations and returns the final cursor.
///
/// Every insertion must land exactly on the running cursor, and every range
/// must lie inside `[start_index, cursor]` at the point it appears.
pub fn check_operations(
    start_index: usize,
    unit: IndexUnit,
    ops: &[EditOperation],
) -> Result<usize, InvariantViolation> {
    let mut cursor = start_index;
    for (position, op) in ops.iter().enumerate() {
        match op {
            EditOperation::InsertText { index, text } => {
                if *index != cursor {
                    return Err(InvariantViolation::DetachedInsert {
                        position,
                        index: *index,
                        cursor,
                    });
                }
                let len = unit.measure(text);
                if len == 0 {
                    return Err(InvariantViolation::EmptyInsert { position });
                }
                cursor += len;
            }
            EditOperation::SetTextStyle { range, .. }
            | EditOperation::SetParagraphStyle { range, .. }
            | EditOperation::SetListBullets { range, .. } => {
                if range.start() < start_index {
                    return Err(InvariantViolation::RangeBehind {
                        position,
                        start: range.start(),
                        end: range.end(),
                        start_index,
                    });
                }
                if range.end() > cursor {
                    return Err(InvariantViolation::RangeAhead {
                        position,
                        start: range.start(),
                        end: range.end(),
                        cursor,
                    });
                }
            }
        }
    }
    Ok(cursor)
}
