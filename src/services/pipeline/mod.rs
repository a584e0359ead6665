//! Incremental transform pipeline.
//!
//! Stages implement `IncrementalTransform`; `TransformManager` runs a chain of
//! them over a batch of documents and reports progress through an event
//! channel.

mod manager;
mod transform;
mod types;

pub use manager::{DocumentOutcome, TransformManager};
pub use transform::{IncrementalTransform, TransformOutput};
pub use types::{BatchTransformResult, TransformEvent};
