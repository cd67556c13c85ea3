use std::ops::Range;

/// Lowercase `text` one char at a time.
///
/// Unlike [`str::to_lowercase`] this never applies context-sensitive rules,
/// so folding a string and folding its pieces always agree.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// A case-folded view of a string that maps matches back to the original.
///
/// Lowercasing may change the byte length of a character, so positions in
/// the folded text are translated through per-character offset tables.
#[derive(Debug, Clone)]
pub struct FoldedText<'a> {
    original: &'a str,
    folded: String,
    /// Byte offset of each original char, plus `original.len()`.
    original_starts: Vec<usize>,
    /// Byte offset in `folded` where each original char's folding begins,
    /// plus `folded.len()`.
    folded_starts: Vec<usize>,
}

impl<'a> FoldedText<'a> {
    pub fn new(original: &'a str) -> Self {
        let mut folded = String::with_capacity(original.len());
        let mut original_starts = Vec::with_capacity(original.len() + 1);
        let mut folded_starts = Vec::with_capacity(original.len() + 1);

        for (idx, c) in original.char_indices() {
            original_starts.push(idx);
            folded_starts.push(folded.len());
            folded.extend(c.to_lowercase());
        }
        original_starts.push(original.len());
        folded_starts.push(folded.len());

        Self {
            original,
            folded,
            original_starts,
            folded_starts,
        }
    }

    /// Number of characters in the original text.
    pub fn char_len(&self) -> usize {
        self.original_starts.len() - 1
    }

    /// Count non-overlapping occurrences of an already folded needle.
    pub fn count(&self, folded_needle: &str) -> usize {
        if folded_needle.is_empty() {
            return 0;
        }
        self.folded.matches(folded_needle).count()
    }

    /// Locate the first occurrence of an already folded needle, as a range
    /// of original character indices.
    pub fn find(&self, folded_needle: &str) -> Option<Range<usize>> {
        if folded_needle.is_empty() {
            return None;
        }
        let start_byte = self.folded.find(folded_needle)?;
        let end_byte = start_byte + folded_needle.len();

        // Char whose folding contains the first matched byte.
        let start = self.folded_starts.partition_point(|&s| s <= start_byte) - 1;
        // First char whose folding begins at or after the match end.
        let end = self
            .folded_starts
            .partition_point(|&s| s < end_byte)
            .min(self.char_len());

        Some(start..end)
    }

    /// Slice the original text by character indices.
    pub fn slice(&self, chars: Range<usize>) -> &'a str {
        let end = chars.end.min(self.char_len());
        let start = chars.start.min(end);
        &self.original[self.original_starts[start]..self.original_starts[end]]
    }
}
