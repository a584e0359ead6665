//! Whitespace tokenizer stage.
//!
//! Produces the token structure the OpenSextant tagger aligns onto, for input
//! that arrives as bare text.

use async_trait::async_trait;

use crate::models::{Document, Offset, OffsetType, Sentence, StreamTime, Tagging, Token};
use crate::services::pipeline::{IncrementalTransform, TransformOutput};
use crate::services::tagging::TaggingError;

pub const WHITESPACE_TAGGER_ID: &str = "whitespace";
const WHITESPACE_TAGGER_VERSION: &str = "1.0";

/// Split text on whitespace. A token ending in `.`, `!` or `?` closes its
/// sentence. Tokens carry both byte and char offsets.
pub fn tokenize(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();
    let mut token_num = 0i32;
    // (byte, char) position where the current word began
    let mut word_start: Option<(usize, usize)> = None;

    let sentinel = std::iter::once((text.len(), ' '));
    for (char_idx, (byte_idx, ch)) in text.char_indices().chain(sentinel).enumerate() {
        if !ch.is_whitespace() {
            word_start.get_or_insert((byte_idx, char_idx));
            continue;
        }
        let Some((byte_start, char_start)) = word_start.take() else {
            continue;
        };

        let word = &text[byte_start..byte_idx];
        current.push(
            Token::new(token_num, word)
                .with_offset(OffsetType::Bytes, Offset::new(byte_start, byte_idx - byte_start))
                .with_offset(OffsetType::Chars, Offset::new(char_start, char_idx - char_start)),
        );
        token_num += 1;

        if word.ends_with(['.', '!', '?']) {
            sentences.push(Sentence::new(std::mem::take(&mut current)));
        }
    }

    if !current.is_empty() {
        sentences.push(Sentence::new(current));
    }
    sentences
}

/// Stage that fills `sentences["whitespace"]` from the clean text.
#[derive(Debug, Default)]
pub struct WhitespaceTokenizer;

#[async_trait]
impl IncrementalTransform for WhitespaceTokenizer {
    fn config_name(&self) -> &str {
        WHITESPACE_TAGGER_ID
    }

    fn display_name(&self) -> &str {
        "Whitespace tokenizer"
    }

    async fn process_item(&self, doc: &mut Document) -> Result<TransformOutput, TaggingError> {
        let Some(text) = doc.clean_visible() else {
            return Ok(TransformOutput::Skipped);
        };

        let sentences = tokenize(text);
        let tokens: usize = sentences.iter().map(|s| s.tokens.len()).sum();
        let detail = format!("{} sentences, {} tokens", sentences.len(), tokens);

        doc.body.taggings.insert(
            WHITESPACE_TAGGER_ID.to_string(),
            Tagging {
                tagger_id: WHITESPACE_TAGGER_ID.to_string(),
                tagger_version: WHITESPACE_TAGGER_VERSION.to_string(),
                generation_time: StreamTime::now(),
            },
        );
        doc.body
            .sentences
            .insert(WHITESPACE_TAGGER_ID.to_string(), sentences);

        Ok(TransformOutput::Processed(detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(sentence: &Sentence) -> Vec<&str> {
        sentence.tokens.iter().map(|t| t.token.as_str()).collect()
    }

    #[test]
    fn test_sentence_breaks() {
        let sentences = tokenize("The capital is Paris. Is it?  Yes");
        assert_eq!(sentences.len(), 3);
        assert_eq!(words(&sentences[0]), ["The", "capital", "is", "Paris."]);
        assert_eq!(words(&sentences[1]), ["Is", "it?"]);
        assert_eq!(words(&sentences[2]), ["Yes"]);
        assert_eq!(sentences[2].tokens[0].token_num, 6);
    }

    #[test]
    fn test_offsets() {
        let text = "Café  au lait";
        let sentences = tokenize(text);
        let toks = &sentences[0].tokens;
        assert_eq!(toks[1].offsets[&OffsetType::Bytes], Offset::new(7, 2));
        assert_eq!(toks[1].offsets[&OffsetType::Chars], Offset::new(6, 2));
        assert_eq!(toks[0].offsets[&OffsetType::Bytes], Offset::new(0, 5));
        assert_eq!(toks[0].offsets[&OffsetType::Chars], Offset::new(0, 4));
        for tok in toks {
            let (start, end) = tok.byte_span().unwrap();
            assert_eq!(&text[start..end], tok.token);
        }
    }

    #[test]
    fn test_blank_text() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\t ").is_empty());
    }

    #[tokio::test]
    async fn test_stage_skips_empty_document() {
        let mut doc = Document::new("1", "");
        let out = WhitespaceTokenizer.process_item(&mut doc).await.unwrap();
        assert_eq!(out, TransformOutput::Skipped);
        assert!(doc.body.sentences.is_empty());
    }

    #[tokio::test]
    async fn test_stage_records_sentences() {
        let mut doc = Document::new("1", "One. Two.");
        let out = WhitespaceTokenizer.process_item(&mut doc).await.unwrap();
        assert_eq!(
            out,
            TransformOutput::Processed("2 sentences, 2 tokens".to_string())
        );
        assert_eq!(doc.sentences(WHITESPACE_TAGGER_ID).unwrap().len(), 2);
        assert!(doc.body.taggings.contains_key(WHITESPACE_TAGGER_ID));
    }
}
