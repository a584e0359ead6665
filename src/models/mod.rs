//! Data models for tagged document streams.

mod document;
mod entity;

pub use document::{
    ContentItem, Document, Offset, OffsetType, Sentence, StreamTime, Tagging, Token,
};
pub use entity::{EntityType, MentionType};
