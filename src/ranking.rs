use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    corpus::SearchableDocument,
    matcher::{ELLIPSIS, PreparedQuery},
    text_util::truncate_chars,
};

/// Weight of one title occurrence relative to one body occurrence.
pub const TITLE_WEIGHT: usize = 3;
pub const BODY_WEIGHT: usize = 1;

/// Length of the body preview used when no field contains the phrase.
pub const FALLBACK_EXCERPT_CHARS: usize = 150;

/// A matching document with its relevance data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub document: SearchableDocument,
    /// Term occurrences in title and body combined.
    pub match_count: usize,
    pub score: usize,
    pub excerpt: String,
}

/// Score a single document, or `None` if no query term occurs in it.
pub fn score_document(
    document: SearchableDocument,
    query: &PreparedQuery,
) -> Option<SearchResult> {
    let title = query.match_text(&document.title);
    let body = query.match_text(&document.body);

    let match_count = title.match_count + body.match_count;
    if match_count == 0 {
        return None;
    }

    let score = TITLE_WEIGHT * title.match_count + BODY_WEIGHT * body.match_count;
    let excerpt = title.excerpt.or(body.excerpt).unwrap_or_else(|| {
        format!(
            "{}{ELLIPSIS}",
            truncate_chars(&document.body, FALLBACK_EXCERPT_CHARS)
        )
    });

    Some(SearchResult {
        document,
        match_count,
        score,
        excerpt,
    })
}

/// Score every document and order the matches by descending score.
///
/// Documents with equal scores keep their relative corpus order.
pub fn rank(documents: Vec<SearchableDocument>, query: &str) -> Vec<SearchResult> {
    let query = PreparedQuery::new(query);
    if query.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = documents
        .into_par_iter()
        .filter_map(|doc| score_document(doc, &query))
        .collect();

    // `sort_by` is stable.
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}
