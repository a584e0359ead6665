//! Types shared between the transform manager and its callers.

/// Events emitted while a batch runs.
/// Used by the CLI to drive progress bars and status messages.
#[derive(Debug, Clone)]
pub enum TransformEvent {
    Started {
        total_documents: usize,
    },
    DocumentStarted {
        document_id: String,
        label: String,
    },
    DocumentCompleted {
        document_id: String,
        details: Vec<String>,
    },
    DocumentFailed {
        document_id: String,
        stage: String,
        error: String,
    },
    DocumentSkipped {
        document_id: String,
    },
    Complete {
        succeeded: usize,
        failed: usize,
        skipped: usize,
    },
}

/// Totals for a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchTransformResult {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}
