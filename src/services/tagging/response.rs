//! OpenSextant extraction response format.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Features block of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {
    #[serde(rename = "isEntity", default)]
    pub is_entity: bool,
    /// Dotted category, coarse to fine.
    pub hierarchy: String,
}

/// A single annotation returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "matchText")]
    pub match_text: String,
    pub features: Features,
}

impl Annotation {
    pub fn new(
        start: usize,
        end: usize,
        match_text: impl Into<String>,
        is_entity: bool,
        hierarchy: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            match_text: match_text.into(),
            features: Features {
                is_entity,
                hierarchy: hierarchy.into(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(rename = "annoList", default)]
    anno_list: Vec<Value>,
}

/// Decoded extraction response.
#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    /// Well-formed annotations in the order the service returned them.
    pub annotations: Vec<Annotation>,
    /// Entity-flagged records that could not be decoded.
    pub malformed: usize,
}

impl ExtractResult {
    /// Decode a response body.
    ///
    /// The body itself must be a JSON object; an absent `annoList` means no
    /// annotations. Records are decoded one at a time so a single bad record
    /// only costs that record.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: RawResponse = serde_json::from_slice(body)?;
        Ok(Self::from_records(raw.anno_list))
    }

    pub fn from_records(records: Vec<Value>) -> Self {
        let mut result = ExtractResult::default();

        for record in records {
            match Annotation::deserialize(&record) {
                Ok(annotation) => result.annotations.push(annotation),
                Err(e) if flagged_entity(&record) => {
                    warn!("skipping malformed annotation ({}): {}", e, record);
                    result.malformed += 1;
                }
                Err(e) => {
                    debug!("skipping undecodable non-entity record ({}): {}", e, record);
                }
            }
        }

        result
    }
}

fn flagged_entity(record: &Value) -> bool {
    record
        .pointer("/features/isEntity")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
