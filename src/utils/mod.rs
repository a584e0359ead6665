//! Shared utility functions.
//!
//! - `offsets`: byte/char offset conversion and safe slicing of UTF-8 text

mod offsets;

pub use offsets::{context_window, CharToByte};
