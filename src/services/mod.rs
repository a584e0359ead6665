//! Service layer: pipeline stages and their orchestration.
//!
//! Services hold no UI concerns and can be driven by the CLI or embedded
//! directly.

pub mod pipeline;
pub mod tagging;
pub mod tokenize;

pub use pipeline::{
    BatchTransformResult, DocumentOutcome, IncrementalTransform, TransformEvent,
    TransformManager, TransformOutput,
};
pub use tagging::{OpenSextantTagger, TaggingError};
pub use tokenize::{WhitespaceTokenizer, WHITESPACE_TAGGER_ID};
