//! Document models for tokenized, tagged text.
//!
//! A `Document` carries a clean plain-text view plus two tagger-keyed maps:
//! `taggings` records which taggers ran, `sentences` holds each tagger's
//! sentence/token structure. Tokens carry their own offsets into the clean
//! text, so independent taggers can be aligned after the fact.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{EntityType, MentionType};

/// Unit an `Offset` is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OffsetType {
    /// Byte positions in the UTF-8 encoded text.
    Bytes,
    /// Unicode scalar positions.
    Chars,
}

/// Half-open span `[first, first + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    pub first: usize,
    pub length: usize,
}

impl Offset {
    pub fn new(first: usize, length: usize) -> Self {
        Self { first, length }
    }

    pub fn end(&self) -> usize {
        self.first + self.length
    }
}

/// A single token produced by a tokenizer.
///
/// Identity (`token`, `offsets`) is owned by the tokenizer. Taggers only
/// write the mention fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Position of the token within the document.
    #[serde(default)]
    pub token_num: i32,
    /// Literal token text.
    pub token: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub offsets: BTreeMap<OffsetType, Offset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mention_type: Option<MentionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mention_id: Option<i32>,
    /// Weak coreference-chain key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equiv_id: Option<i32>,
}

impl Token {
    pub fn new(token_num: i32, token: impl Into<String>) -> Self {
        Self {
            token_num,
            token: token.into(),
            offsets: BTreeMap::new(),
            entity_type: None,
            mention_type: None,
            mention_id: None,
            equiv_id: None,
        }
    }

    pub fn with_offset(mut self, offset_type: OffsetType, offset: Offset) -> Self {
        self.offsets.insert(offset_type, offset);
        self
    }

    /// Byte span `(start, end)` if the tokenizer recorded byte offsets.
    pub fn byte_span(&self) -> Option<(usize, usize)> {
        self.offsets
            .get(&OffsetType::Bytes)
            .map(|o| (o.first, o.end()))
    }

    /// Record a mention on this token. Entity and mention types are always
    /// written together.
    pub fn set_mention(
        &mut self,
        entity_type: EntityType,
        mention_type: MentionType,
        mention_id: i32,
        equiv_id: i32,
    ) {
        self.entity_type = Some(entity_type);
        self.mention_type = Some(mention_type);
        self.mention_id = Some(mention_id);
        self.equiv_id = Some(equiv_id);
    }

    pub fn is_tagged(&self) -> bool {
        self.entity_type.is_some()
    }
}

/// Ordered run of tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

/// Timestamp in both epoch and ISO-8601 form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamTime {
    pub epoch_ticks: f64,
    pub zulu_timestamp: String,
}

impl StreamTime {
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self {
            epoch_ticks: at.timestamp_micros() as f64 / 1_000_000.0,
            zulu_timestamp: at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

/// Record that a tagger ran over a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tagging {
    pub tagger_id: String,
    pub tagger_version: String,
    pub generation_time: StreamTime,
}

/// Text views and tagger output of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// UTF-8 plain text with markup removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean_visible: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub taggings: BTreeMap<String, Tagging>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sentences: BTreeMap<String, Vec<Sentence>>,
}

/// A document flowing through the tagging pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub stream_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abs_url: Option<String>,
    #[serde(default)]
    pub body: ContentItem,
}

impl Document {
    pub fn new(stream_id: impl Into<String>, clean_visible: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            abs_url: None,
            body: ContentItem {
                clean_visible: Some(clean_visible.into()),
                ..Default::default()
            },
        }
    }

    /// Clean text, or `None` when the view is missing or empty.
    pub fn clean_visible(&self) -> Option<&str> {
        self.body
            .clean_visible
            .as_deref()
            .filter(|text| !text.is_empty())
    }

    pub fn sentences(&self, tagger_id: &str) -> Option<&[Sentence]> {
        self.body.sentences.get(tagger_id).map(Vec::as_slice)
    }

    /// Short label for progress output.
    pub fn label(&self) -> String {
        self.abs_url.clone().unwrap_or_else(|| self.stream_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_span() {
        let tok = Token::new(0, "Paris,").with_offset(OffsetType::Bytes, Offset::new(13, 6));
        assert_eq!(tok.byte_span(), Some((13, 19)));

        let no_bytes = Token::new(1, "x").with_offset(OffsetType::Chars, Offset::new(0, 1));
        assert_eq!(no_bytes.byte_span(), None);
    }

    #[test]
    fn test_empty_clean_visible_is_none() {
        let doc = Document::new("1-abc", "");
        assert!(doc.clean_visible().is_none());

        let doc = Document::default();
        assert!(doc.clean_visible().is_none());

        let doc = Document::new("1-abc", "text");
        assert_eq!(doc.clean_visible(), Some("text"));
    }

    #[test]
    fn test_untagged_token_omits_mention_fields() {
        let tok = Token::new(3, "to").with_offset(OffsetType::Bytes, Offset::new(10, 2));
        let json = serde_json::to_value(&tok).unwrap();
        assert!(json.get("entity_type").is_none());
        assert!(json.get("mention_id").is_none());
        assert_eq!(json["offsets"]["BYTES"]["first"], 10);
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let mut doc = Document::new("7-deadbeef", "Hello there.");
        doc.body.sentences.insert(
            "whitespace".into(),
            vec![Sentence::new(vec![Token::new(0, "Hello")])],
        );
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_stream_time_is_zulu() {
        let at = DateTime::parse_from_rfc3339("2014-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let st = StreamTime::from_datetime(at);
        assert_eq!(st.epoch_ticks, 1393675200.0);
        assert!(st.zulu_timestamp.starts_with("2014-03-01T12:00:00"));
        assert!(st.zulu_timestamp.ends_with('Z'));
    }
}
