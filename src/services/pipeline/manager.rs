//! Transform manager - sequential batch orchestration for a stage chain.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use super::transform::{IncrementalTransform, TransformOutput};
use super::types::{BatchTransformResult, TransformEvent};
use crate::models::Document;

/// What happened to one document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    /// At least one stage did work; one detail line per stage that did.
    Completed(Vec<String>),
    /// Every stage skipped the document.
    Skipped,
    /// A stage failed. Later stages did not run on this document.
    Failed { stage: String, error: String },
}

/// Runs a chain of `IncrementalTransform`s over documents, strictly in order.
pub struct TransformManager {
    transforms: Vec<Arc<dyn IncrementalTransform>>,
}

impl TransformManager {
    pub fn new(transforms: Vec<Arc<dyn IncrementalTransform>>) -> Self {
        Self { transforms }
    }

    /// Fail fast when any stage reports it cannot run.
    pub async fn ensure_available(&self) -> anyhow::Result<()> {
        for transform in &self.transforms {
            if !transform.is_available().await {
                anyhow::bail!(
                    "{} is not available: {}",
                    transform.display_name(),
                    transform.availability_hint()
                );
            }
        }
        Ok(())
    }

    /// Run every stage over one document.
    pub async fn process_one(&self, doc: &mut Document) -> DocumentOutcome {
        let mut details = Vec::new();

        for transform in &self.transforms {
            match transform.process_item(doc).await {
                Ok(TransformOutput::Processed(detail)) => {
                    details.push(format!("{}: {}", transform.config_name(), detail));
                }
                Ok(TransformOutput::Skipped) => {}
                Err(e) => {
                    warn!(
                        "{} failed on {}: {}",
                        transform.display_name(),
                        doc.label(),
                        e
                    );
                    return DocumentOutcome::Failed {
                        stage: transform.config_name().to_string(),
                        error: e.to_string(),
                    };
                }
            }
        }

        if details.is_empty() {
            DocumentOutcome::Skipped
        } else {
            DocumentOutcome::Completed(details)
        }
    }

    /// Run the chain over a batch, emitting events for progress tracking.
    ///
    /// A failing document is counted and left as the failing stage found it;
    /// the batch carries on with the next document.
    pub async fn run_batch(
        &self,
        docs: &mut [Document],
        event_tx: mpsc::Sender<TransformEvent>,
    ) -> BatchTransformResult {
        let _ = event_tx
            .send(TransformEvent::Started {
                total_documents: docs.len(),
            })
            .await;

        let mut result = BatchTransformResult::default();

        for doc in docs.iter_mut() {
            let _ = event_tx
                .send(TransformEvent::DocumentStarted {
                    document_id: doc.stream_id.clone(),
                    label: doc.label(),
                })
                .await;

            let event = match self.process_one(doc).await {
                DocumentOutcome::Completed(details) => {
                    result.succeeded += 1;
                    TransformEvent::DocumentCompleted {
                        document_id: doc.stream_id.clone(),
                        details,
                    }
                }
                DocumentOutcome::Skipped => {
                    result.skipped += 1;
                    TransformEvent::DocumentSkipped {
                        document_id: doc.stream_id.clone(),
                    }
                }
                DocumentOutcome::Failed { stage, error } => {
                    result.failed += 1;
                    TransformEvent::DocumentFailed {
                        document_id: doc.stream_id.clone(),
                        stage,
                        error,
                    }
                }
            };
            let _ = event_tx.send(event).await;
        }

        let _ = event_tx
            .send(TransformEvent::Complete {
                succeeded: result.succeeded,
                failed: result.failed,
                skipped: result.skipped,
            })
            .await;

        result
    }

    pub fn shutdown(&self) {
        for transform in &self.transforms {
            transform.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tagging::TaggingError;
    use async_trait::async_trait;

    /// Stage that appends a marker to the text, or fails on a chosen id.
    struct Marker {
        name: &'static str,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl IncrementalTransform for Marker {
        fn config_name(&self) -> &str {
            self.name
        }

        fn display_name(&self) -> &str {
            self.name
        }

        async fn process_item(&self, doc: &mut Document) -> Result<TransformOutput, TaggingError> {
            if Some(doc.stream_id.as_str()) == self.fail_on {
                return Err(TaggingError::Config("boom".to_string()));
            }
            let Some(text) = doc.body.clean_visible.as_mut().filter(|t| !t.is_empty()) else {
                return Ok(TransformOutput::Skipped);
            };
            text.push_str(self.name);
            Ok(TransformOutput::Processed("marked".to_string()))
        }
    }

    fn manager(fail_on: Option<&'static str>) -> TransformManager {
        TransformManager::new(vec![
            Arc::new(Marker {
                name: "a",
                fail_on: None,
            }),
            Arc::new(Marker {
                name: "b",
                fail_on,
            }),
        ])
    }

    struct Offline;

    #[async_trait]
    impl IncrementalTransform for Offline {
        fn config_name(&self) -> &str {
            "offline"
        }

        fn display_name(&self) -> &str {
            "Offline stage"
        }

        async fn is_available(&self) -> bool {
            false
        }

        fn availability_hint(&self) -> String {
            "service down".to_string()
        }

        async fn process_item(&self, _doc: &mut Document) -> Result<TransformOutput, TaggingError> {
            Ok(TransformOutput::Skipped)
        }
    }

    #[tokio::test]
    async fn test_ensure_available() {
        assert!(manager(None).ensure_available().await.is_ok());

        let offline = TransformManager::new(vec![Arc::new(Offline)]);
        let err = offline.ensure_available().await.unwrap_err();
        assert_eq!(err.to_string(), "Offline stage is not available: service down");
    }

    #[tokio::test]
    async fn test_stages_run_in_order() {
        let mut doc = Document::new("1", "x");
        let outcome = manager(None).process_one(&mut doc).await;
        assert_eq!(doc.clean_visible(), Some("xab"));
        assert_eq!(
            outcome,
            DocumentOutcome::Completed(vec!["a: marked".to_string(), "b: marked".to_string()])
        );
    }

    #[tokio::test]
    async fn test_all_skipped() {
        let mut doc = Document::new("1", "");
        assert_eq!(
            manager(None).process_one(&mut doc).await,
            DocumentOutcome::Skipped
        );
    }

    #[tokio::test]
    async fn test_batch_continues_past_failure() {
        let mut docs = vec![
            Document::new("1", "x"),
            Document::new("2", "y"),
            Document::new("3", ""),
        ];
        let (tx, mut rx) = mpsc::channel(64);

        let result = manager(Some("2")).run_batch(&mut docs, tx).await;

        assert_eq!(
            result,
            BatchTransformResult {
                succeeded: 1,
                failed: 1,
                skipped: 1
            }
        );
        assert_eq!(docs[0].clean_visible(), Some("xab"));
        // first stage ran, the failing one left no trace
        assert_eq!(docs[1].clean_visible(), Some("ya"));

        let mut failed_stage = None;
        let mut saw_complete = false;
        while let Some(event) = rx.recv().await {
            match event {
                TransformEvent::DocumentFailed { stage, .. } => failed_stage = Some(stage),
                TransformEvent::Complete { failed, .. } => {
                    assert_eq!(failed, 1);
                    saw_complete = true;
                }
                _ => {}
            }
        }
        assert_eq!(failed_stage.as_deref(), Some("b"));
        assert!(saw_complete);
    }
}
