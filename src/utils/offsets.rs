//! Byte/char offset helpers for UTF-8 text.
//!
//! Remote taggers and local tokenizers do not always agree on what an offset
//! counts. Tokens here are keyed by byte offset; these helpers convert
//! character offsets into that space and slice text without panicking on
//! positions that fall inside a multi-byte character.

/// Pre-computed char index -> byte index table for one text.
///
/// ASCII text maps to itself, so no table is built for it.
pub struct CharToByte {
    table: Vec<usize>,
    len: usize,
    is_ascii: bool,
}

impl CharToByte {
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                table: Vec::new(),
                len: text.len(),
                is_ascii: true,
            };
        }

        let mut table: Vec<usize> = text.char_indices().map(|(byte_idx, _)| byte_idx).collect();
        table.push(text.len());
        Self {
            table,
            len: text.len(),
            is_ascii: false,
        }
    }

    /// Byte offset of the `char_idx`-th character. Positions past the end of
    /// the text clamp to its byte length.
    pub fn convert(&self, char_idx: usize) -> usize {
        if self.is_ascii {
            char_idx.min(self.len)
        } else {
            self.table.get(char_idx).copied().unwrap_or(self.len)
        }
    }
}

fn floor_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// The byte range `[start, end)` widened by `width` characters on each side,
/// snapped to character boundaries and clamped to the text.
pub fn context_window(text: &str, start: usize, end: usize, width: usize) -> &str {
    let start = floor_boundary(text, start);
    let end = ceil_boundary(text, end.max(start));

    let lo = text[..start]
        .char_indices()
        .rev()
        .take(width)
        .last()
        .map_or(start, |(i, _)| i);
    let hi = text[end..]
        .char_indices()
        .nth(width)
        .map_or(text.len(), |(i, _)| end + i);

    &text[lo..hi]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_identity() {
        let map = CharToByte::new("Traveling to Paris");
        assert_eq!(map.convert(0), 0);
        assert_eq!(map.convert(13), 13);
        assert_eq!(map.convert(500), 18);
    }

    #[test]
    fn test_multibyte_conversion() {
        // '☂' is 3 bytes, 'ç' is 2 bytes
        let text = "\u{2602} on Fran\u{e7}oise";
        let map = CharToByte::new(text);
        assert_eq!(map.convert(0), 0);
        assert_eq!(map.convert(1), 3);
        assert_eq!(map.convert(5), 7);
        // "Françoise" is chars 5..14
        let (s, e) = (map.convert(5), map.convert(14));
        assert_eq!(&text[s..e], "Fran\u{e7}oise");
        assert_eq!(map.convert(99), text.len());
    }

    #[test]
    fn test_context_window_ascii() {
        let text = "Traveling to Paris, Texas.";
        assert_eq!(context_window(text, 13, 18, 3), "to Paris, T");
        assert_eq!(context_window(text, 0, 9, 3), "Traveling to");
        assert_eq!(context_window(text, 20, 26, 3), "s, Texas.");
    }

    #[test]
    fn test_context_window_snaps_inside_multibyte() {
        let text = "a\u{2602}b";
        // byte 2 is inside the umbrella
        let window = context_window(text, 2, 2, 0);
        assert!(window.is_empty() || window == "\u{2602}");
        assert_eq!(context_window(text, 1, 4, 1), text);
    }

    #[test]
    fn test_context_window_out_of_range() {
        let text = "short";
        assert_eq!(context_window(text, 40, 50, 3), "ort");
    }
}
