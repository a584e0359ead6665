//! OpenSextant tagging stage.

use async_trait::async_trait;
use tracing::{info, warn};

use super::align::{align_annotations, AlignStats, OffsetUnit};
use super::client::{ExtractClient, OpenSextantClient};
use super::error::TaggingError;
use crate::config::{TaggerConfig, CONFIG_NAME};
use crate::models::{Document, StreamTime, Tagging};
use crate::services::pipeline::{IncrementalTransform, TransformOutput};

/// Key the stage's tagging record and sentences are stored under.
pub const TAGGER_ID: &str = "opensextant";
pub const TAGGER_VERSION: &str = "2.1";

/// Sends each document's clean text to OpenSextant and records the returned
/// entities on a copy of an earlier tokenizer's sentences.
///
/// The source tokenizer's sentences are never modified; the annotated copy
/// is stored under [`TAGGER_ID`].
pub struct OpenSextantTagger {
    client: Box<dyn ExtractClient>,
    source_tagger_id: String,
    offset_unit: OffsetUnit,
}

impl OpenSextantTagger {
    pub fn new(config: &TaggerConfig) -> Result<Self, TaggingError> {
        let client = OpenSextantClient::new(config)?;
        Ok(Self::with_client(Box::new(client), config))
    }

    /// Use an arbitrary extraction client, e.g. a canned one in tests.
    pub fn with_client(client: Box<dyn ExtractClient>, config: &TaggerConfig) -> Self {
        Self {
            client,
            source_tagger_id: config.source_tagger_id.clone(),
            offset_unit: config.offset_unit,
        }
    }

    fn make_tagging(&self) -> Tagging {
        Tagging {
            tagger_id: TAGGER_ID.to_string(),
            tagger_version: TAGGER_VERSION.to_string(),
            generation_time: StreamTime::now(),
        }
    }

    /// Tag one document.
    ///
    /// Returns `Ok(None)` for a document without clean text. On error the
    /// document is untouched.
    pub async fn tag(&self, doc: &mut Document) -> Result<Option<AlignStats>, TaggingError> {
        let Some(text) = doc.clean_visible() else {
            return Ok(None);
        };

        let mut sentences = doc
            .sentences(&self.source_tagger_id)
            .ok_or_else(|| TaggingError::MissingTokens {
                tagger_id: self.source_tagger_id.clone(),
            })?
            .to_vec();

        let result = self.client.extract(text).await?;
        if result.malformed > 0 {
            warn!(
                "{}: {} malformed annotations from {}",
                doc.label(),
                result.malformed,
                self.client.endpoint()
            );
        }

        let stats = align_annotations(&mut sentences, &result.annotations, text, self.offset_unit);
        info!("{}: {}", doc.label(), stats);

        doc.body
            .taggings
            .insert(TAGGER_ID.to_string(), self.make_tagging());
        doc.body.sentences.insert(TAGGER_ID.to_string(), sentences);

        Ok(Some(stats))
    }
}

#[async_trait]
impl IncrementalTransform for OpenSextantTagger {
    fn config_name(&self) -> &str {
        CONFIG_NAME
    }

    fn display_name(&self) -> &str {
        "OpenSextant"
    }

    async fn is_available(&self) -> bool {
        self.client.is_available().await
    }

    fn availability_hint(&self) -> String {
        format!(
            "no 'general' extractor reachable near {}",
            self.client.endpoint()
        )
    }

    async fn process_item(&self, doc: &mut Document) -> Result<TransformOutput, TaggingError> {
        Ok(match self.tag(doc).await? {
            Some(stats) => TransformOutput::Processed(stats.to_string()),
            None => TransformOutput::Skipped,
        })
    }
}
