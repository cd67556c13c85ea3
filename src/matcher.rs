//! Term counting and excerpt extraction for a single text field.
//!
//! A query is used two ways. Split on whitespace, each lowercase term is
//! counted independently. Unsplit, the whole query is the phrase whose first
//! occurrence anchors the excerpt. All comparisons are case-insensitive and
//! literal: characters such as `.` or `*` carry no special meaning.

use crate::text_util::{FoldedText, fold_case};

/// Characters of context kept on each side of the phrase in an excerpt.
pub const EXCERPT_CONTEXT_CHARS: usize = 50;

/// Marker for text cut off at either edge of an excerpt.
pub const ELLIPSIS: &str = "...";

/// Result of matching a query against one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Total occurrences of all query terms.
    pub match_count: usize,
    /// Context around the first verbatim occurrence of the whole query.
    /// `None` when the phrase does not appear, even if terms matched.
    pub excerpt: Option<String>,
}

/// A query folded and split once, reusable across many fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    phrase: String,
    terms: Vec<String>,
}

impl PreparedQuery {
    pub fn new(query: &str) -> Self {
        let terms = if query.trim().is_empty() {
            Vec::new()
        } else {
            query.split_whitespace().map(fold_case).collect()
        };
        Self {
            phrase: fold_case(query),
            terms,
        }
    }

    /// True when the query has no terms after trimming.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn match_text(&self, text: &str) -> MatchOutcome {
        if self.is_empty() {
            return MatchOutcome::default();
        }

        let folded = FoldedText::new(text);
        let match_count = self.terms.iter().map(|t| folded.count(t)).sum();
        let excerpt = excerpt_around_phrase(&folded, &self.phrase);

        MatchOutcome {
            match_count,
            excerpt,
        }
    }
}

/// Match `query` against `text`.
pub fn match_text(text: &str, query: &str) -> MatchOutcome {
    PreparedQuery::new(query).match_text(text)
}

fn excerpt_around_phrase(text: &FoldedText<'_>, phrase: &str) -> Option<String> {
    let found = text.find(phrase)?;
    let start = found.start.saturating_sub(EXCERPT_CONTEXT_CHARS);
    let end = (found.end + EXCERPT_CONTEXT_CHARS).min(text.char_len());

    let mut excerpt = String::new();
    if start > 0 {
        excerpt.push_str(ELLIPSIS);
    }
    excerpt.push_str(text.slice(start..end));
    if end < text.char_len() {
        excerpt.push_str(ELLIPSIS);
    }
    Some(excerpt)
}
