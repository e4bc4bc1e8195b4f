pub mod convert;
pub mod io;
pub mod markup;
pub mod ops;
pub mod replay;

// Re-export key types for easier usage
pub use convert::{ConvertOptions, InsertionEngine, convert, convert_html, convert_markdown};
pub use io::*;
pub use markup::{MarkupNode, parse_html, parse_markdown};
pub use ops::{
    BatchUpdate, BulletPreset, CharacterStyle, EditOperation, IndexUnit, InvariantViolation,
    NamedStyle, OperationSequence, TextRange, WireError, check_invariants,
};
pub use replay::{ReplayDocument, ReplayError, ReplayFailure};
