//! OpenSextant tagging: remote extraction plus token alignment.
//!
//! The service is a black box that takes plain text and returns annotations
//! with character spans and a dotted category. `type_map` turns categories
//! into entity/mention types and `align` writes them onto the tokens some
//! earlier tokenizer produced.

mod align;
mod client;
mod error;
mod response;
mod tagger;
pub mod type_map;

pub use align::{align_annotations, AlignStats, OffsetUnit};
pub use client::{ExtractClient, OpenSextantClient};
pub use error::TaggingError;
pub use response::{Annotation, ExtractResult, Features};
pub use tagger::{OpenSextantTagger, TAGGER_ID, TAGGER_VERSION};
pub use type_map::resolve;
