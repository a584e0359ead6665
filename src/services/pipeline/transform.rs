//! IncrementalTransform trait - one stage of the document pipeline.

use async_trait::async_trait;

use crate::models::Document;
use crate::services::tagging::TaggingError;

/// Result of running a stage over one document.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformOutput {
    /// The stage wrote its output; the string summarizes what it did.
    Processed(String),
    /// Nothing to do for this document (e.g. no clean text).
    Skipped,
}

/// A stage that mutates documents one at a time.
///
/// Stages are chained: later stages see what earlier ones wrote.
#[async_trait]
pub trait IncrementalTransform: Send + Sync {
    /// Name of the stage's configuration section.
    fn config_name(&self) -> &str;

    /// Human-readable name for CLI progress output.
    fn display_name(&self) -> &str;

    /// Whether the stage can run right now.
    async fn is_available(&self) -> bool {
        true
    }

    /// Human-readable reason when `is_available` returns false.
    fn availability_hint(&self) -> String {
        String::new()
    }

    /// Process a single document in place.
    ///
    /// On error the document must be left as it was before the call.
    async fn process_item(&self, doc: &mut Document) -> Result<TransformOutput, TaggingError>;

    /// Release resources once the batch is done.
    fn shutdown(&self) {}
}
