//! Align remote annotations onto locally tokenized sentences.
//!
//! The tagging service reports character spans over the text it was sent;
//! the tokenizer that produced our sentences reports its own byte spans. The
//! two never share token boundaries, so every token whose span intersects an
//! annotation's span receives that annotation's mention.
//!
//! Overlapping annotations are applied in response order and the last one
//! to touch a token wins. The service does not document its ordering, so
//! which annotation wins an overlap is effectively arbitrary.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::response::Annotation;
use super::type_map::{is_known_category, resolve};
use crate::models::Sentence;
use crate::utils::{context_window, CharToByte};

/// Unit of the offsets in the service's annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    #[default]
    Bytes,
    Chars,
}

/// Per-document alignment counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlignStats {
    /// Annotations considered.
    pub annotations: usize,
    /// Skipped because `isEntity` was false.
    pub non_entity: usize,
    /// Skipped because the category resolved to no entity type.
    pub unmapped: usize,
    /// Offsets that did not select the matched text.
    pub misaligned: usize,
    /// Mention ids handed out.
    pub mentions: usize,
    /// Token writes, counting overwrites.
    pub token_updates: usize,
}

impl std::fmt::Display for AlignStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} mentions, {} token updates ({} annotations, {} non-entity, {} unmapped, {} misaligned)",
            self.mentions,
            self.token_updates,
            self.annotations,
            self.non_entity,
            self.unmapped,
            self.misaligned
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    start: usize,
    end: usize,
    sentence: usize,
    token: usize,
}

/// Tokens of all sentences, flattened and ordered by byte start.
///
/// `max_end[i]` is the largest end among `entries[..=i]`, which keeps the
/// lower bound of a range query a binary search even if token spans nest.
struct TokenIndex {
    entries: Vec<IndexEntry>,
    max_end: Vec<usize>,
}

impl TokenIndex {
    fn build(sentences: &[Sentence]) -> Self {
        let mut entries = Vec::new();
        let mut missing = 0usize;

        for (sentence, sent) in sentences.iter().enumerate() {
            for (token, tok) in sent.tokens.iter().enumerate() {
                match tok.byte_span() {
                    Some((start, end)) => entries.push(IndexEntry {
                        start,
                        end,
                        sentence,
                        token,
                    }),
                    None => missing += 1,
                }
            }
        }

        if missing > 0 {
            debug!("{} tokens have no byte offsets and cannot be aligned", missing);
        }

        entries.sort_by_key(|e| (e.start, e.sentence, e.token));

        let mut max_end = Vec::with_capacity(entries.len());
        let mut running = 0usize;
        for entry in &entries {
            running = running.max(entry.end);
            max_end.push(running);
        }

        Self { entries, max_end }
    }

    /// Positions `(sentence, token)` of tokens intersecting `[start, end)`,
    /// in offset order.
    fn overlapping(&self, start: usize, end: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (lo, hi) = if start < end {
            let hi = self.entries.partition_point(|e| e.start < end);
            let lo = self.max_end.partition_point(|&m| m <= start).min(hi);
            (lo, hi)
        } else {
            (0, 0)
        };

        self.entries[lo..hi]
            .iter()
            .filter(move |e| e.end > start)
            .map(|e| (e.sentence, e.token))
    }
}

fn selects_match(text: &str, start: usize, end: usize, match_text: &str) -> bool {
    text.as_bytes()
        .get(start..end)
        .is_some_and(|span| span == match_text.as_bytes())
}

/// Write entity mentions from `annotations` onto the tokens of `sentences`.
///
/// `text` is the document text the service was given. Mention ids start at
/// zero for every call and are shared by all tokens of one annotation; the
/// equivalence id always equals the mention id since no coreference is
/// computed. Tokens outside every resolved annotation are left untouched.
pub fn align_annotations(
    sentences: &mut [Sentence],
    annotations: &[Annotation],
    text: &str,
    unit: OffsetUnit,
) -> AlignStats {
    let index = TokenIndex::build(sentences);
    let char_map = match unit {
        OffsetUnit::Chars => Some(CharToByte::new(text)),
        OffsetUnit::Bytes => None,
    };

    let mut stats = AlignStats::default();
    let mut mention_id: i32 = 0;

    for anno in annotations {
        stats.annotations += 1;

        if !anno.features.is_entity {
            debug!(
                "skipping isEntity=false: {:?} ({})",
                anno.match_text, anno.features.hierarchy
            );
            stats.non_entity += 1;
            continue;
        }

        let (start, end) = match &char_map {
            Some(map) => (map.convert(anno.start), map.convert(anno.end)),
            None => (anno.start, anno.end),
        };

        if !selects_match(text, start, end, &anno.match_text) {
            error!(
                "alignment failure: {:?} (take 3 chars off ends) != {:?}",
                context_window(text, start, end, 3),
                anno.match_text
            );
            stats.misaligned += 1;
        }

        let hierarchy = anno.features.hierarchy.as_str();
        if !is_known_category(hierarchy) {
            debug!("category {:?} is not in the OpenSextant taxonomy", hierarchy);
        }

        let Some((entity_type, mention_type)) = resolve(hierarchy) else {
            stats.unmapped += 1;
            continue;
        };

        for (sentence, token) in index.overlapping(start, end) {
            sentences[sentence].tokens[token].set_mention(
                entity_type,
                mention_type,
                mention_id,
                mention_id,
            );
            stats.token_updates += 1;
        }

        mention_id += 1;
        stats.mentions += 1;
    }

    stats
}
