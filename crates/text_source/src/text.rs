//! Codepoint utilities for element-backed content.
//!
//! Offsets exposed by text sources count codepoints, while slicing a `str`
//! needs byte indices. [`CodepointText`] keeps both views of one string.

use std::borrow::Cow;

/// Rebuild the byte index of every codepoint boundary in `value`.
///
/// The result holds one entry per codepoint plus a trailing `value.len()`,
/// so `out[i]` is the byte offset of codepoint `i` for `i <= char count`.
///
/// # Examples
///
/// ```
/// use text_source::rebuild_codepoint_boundaries;
///
/// let mut boundaries = Vec::new();
/// rebuild_codepoint_boundaries("a€b", &mut boundaries);
/// assert_eq!(boundaries, vec![0, 1, 4, 5]);
/// ```
pub fn rebuild_codepoint_boundaries(value: &str, out: &mut Vec<usize>) {
    out.clear();
    out.extend(value.char_indices().map(|(i, _)| i));
    out.push(value.len());
}

/// Remove zero-width space (U+200B) and zero-width non-joiner (U+200C).
///
/// Returns `Cow::Borrowed` when neither character is present.
///
/// # Examples
///
/// ```
/// use text_source::strip_zero_width;
///
/// assert_eq!(strip_zero_width("plain"), "plain");
/// assert_eq!(strip_zero_width("a\u{200B}b\u{200C}c"), "abc");
/// ```
pub fn strip_zero_width(s: &str) -> Cow<'_, str> {
    // Both characters encode as E2 80 8x; no E2 byte means nothing to strip.
    if memchr::memchr(0xE2, s.as_bytes()).is_none() {
        return Cow::Borrowed(s);
    }
    if !s.contains(['\u{200B}', '\u{200C}']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.chars()
            .filter(|c| !matches!(c, '\u{200B}' | '\u{200C}'))
            .collect(),
    )
}

/// A string addressable by codepoint index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CodepointText {
    text: String,
    boundaries: Vec<usize>,
}

impl CodepointText {
    pub(crate) fn new(text: String) -> Self {
        let mut boundaries = Vec::with_capacity(text.len() + 1);
        rebuild_codepoint_boundaries(&text, &mut boundaries);
        Self { text, boundaries }
    }

    #[inline]
    pub(crate) fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of codepoints.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Slice by codepoint indices; both are clamped to the text length.
    pub(crate) fn slice(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.len());
        let start = start.min(end);
        &self.text[self.boundaries[start]..self.boundaries[end]]
    }
}
