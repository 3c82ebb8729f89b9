//! Scanner module - rule matching over normalized text
//!
//! [`scan`] applies every rule of a set, in load order, to one document's
//! normalized text. Each non-overlapping match (standard left-to-right
//! regex search) yields one [`Finding`] with character offsets and a
//! bounded context snippet.

pub mod normalize;

pub use normalize::normalize;

use crate::rules::{Finding, Rule};

/// Characters of context kept on each side of a match
pub const SNIPPET_WINDOW: usize = 80;

/// Lazily scan `text` with `rules`.
///
/// The iterator is finite and single-pass; call `scan` again to rescan.
pub fn scan<'a>(text: &'a str, rules: &'a [Rule]) -> impl Iterator<Item = Finding> + 'a {
    rules.iter().flat_map(move |rule| {
        let mut offsets = CharOffsets::new(text);
        rule.pattern.find_iter(text).map(move |m| {
            let start = offsets.char_offset(m.start());
            let end = offsets.char_offset(m.end());
            let snippet = snippet(text, m.start(), m.end(), SNIPPET_WINDOW);
            Finding::from_match(&rule.id, &rule.label, rule.severity, start, end, snippet)
        })
    })
}

/// Context window around the byte range `start..end`, with line breaks
/// flattened to spaces.
///
/// The window extends up to `window` characters on each side of the match.
pub fn snippet(text: &str, start: usize, end: usize, window: usize) -> String {
    let lo = if window == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(window - 1)
            .map_or(0, |(i, _)| i)
    };
    let hi = text[end..]
        .char_indices()
        .nth(window)
        .map_or(text.len(), |(i, _)| end + i);

    flatten_lines(&text[lo..hi])
}

/// Replace line breaks with spaces
pub fn flatten_lines(s: &str) -> String {
    s.replace(['\n', '\r'], " ")
}

/// Converts increasing byte offsets into character offsets without
/// rescanning from the start of the text each time.
struct CharOffsets<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharOffsets<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn char_offset(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}
