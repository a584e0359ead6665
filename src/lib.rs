//! OpenSextant tagging for tokenized document streams.
//!
//! Documents carry clean text and the sentences produced by some earlier
//! tokenizer. The OpenSextant stage sends the text to a remote extraction
//! service and writes the returned person, organization, location, facility
//! and event mentions onto a copy of those tokens.

pub mod config;
pub mod models;
pub mod services;
pub mod utils;
