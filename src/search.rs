use std::time::Instant;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    corpus::{ContentDirCorpus, CorpusProvider, SearchableDocument},
    error::Result,
    ranking::{self, SearchResult},
};

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_OFFSET: usize = 0;

/// Restrictions applied to the corpus before scoring.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
pub struct SearchFilters {
    /// Only search documents of this kind (`page`, `heading` or `text`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl SearchFilters {
    fn accepts(&self, document: &SearchableDocument) -> bool {
        match self.kind.as_deref() {
            None | Some("") => true,
            Some(kind) => document.kind.as_str() == kind,
        }
    }
}

/// Pagination window and filters for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of results to return; `0` returns every match.
    pub limit: usize,
    /// Number of ranked matches to skip.
    pub offset: usize,
    pub filters: SearchFilters,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
            filters: SearchFilters::default(),
        }
    }
}

/// One page of ranked results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    /// Number of matches before pagination.
    pub total: usize,
    pub query: String,
    /// Wall-clock milliseconds spent on the query. Diagnostic only.
    pub search_time: u64,
    pub limit: usize,
    pub offset: usize,
}

impl SearchResponse {
    fn empty(options: &SearchOptions) -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            query: String::new(),
            search_time: 0,
            limit: options.limit,
            offset: options.offset,
        }
    }
}

/// Run a query against a fresh snapshot of the corpus.
///
/// 1. Blank queries return an empty response without touching the corpus
/// 2. Load the corpus; an unavailable corpus is searched as if empty
/// 3. Apply filters
/// 4. Score and rank
/// 5. Slice by offset / limit
///
/// Never fails: corpus errors are logged and degrade to fewer results.
pub fn execute_search<P>(
    corpus: &P,
    query: &str,
    options: &SearchOptions,
) -> SearchResponse
where
    P: CorpusProvider + ?Sized,
{
    if query.trim().is_empty() {
        return SearchResponse::empty(options);
    }

    let start = Instant::now();

    let documents = match corpus.load() {
        Ok(documents) => documents,
        Err(e) => {
            warn!(error = %e, "corpus unavailable, searching an empty corpus");
            Vec::new()
        }
    };

    let documents: Vec<SearchableDocument> = documents
        .into_iter()
        .filter(|doc| options.filters.accepts(doc))
        .collect();

    let ranked = ranking::rank(documents, query);
    let total = ranked.len();
    let results = paginate(ranked, options.offset, options.limit);

    let search_time =
        u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    debug!(
        query,
        returned = results.len(),
        total,
        search_time_ms = search_time,
        "search complete"
    );

    SearchResponse {
        results,
        total,
        query: query.to_string(),
        search_time,
        limit: options.limit,
        offset: options.offset,
    }
}

fn paginate(
    results: Vec<SearchResult>,
    offset: usize,
    limit: usize,
) -> Vec<SearchResult> {
    let remaining = results.into_iter().skip(offset);
    if limit == 0 {
        remaining.collect()
    } else {
        remaining.take(limit).collect()
    }
}

/// Render a response for human-readable terminal output.
pub fn render_human(response: &SearchResponse) -> String {
    if response.results.is_empty() {
        return "No results found.".to_string();
    }

    let mut lines = Vec::with_capacity(response.results.len() * 2 + 2);
    for (i, r) in response.results.iter().enumerate() {
        lines.push(format!(
            "{:>3}. [{}] {} ({}) id={} matches={}",
            response.offset + i + 1,
            r.score,
            r.document.path,
            r.document.title,
            r.document.id,
            r.match_count,
        ));
        lines.push(format!("     {}", single_line(&r.excerpt)));
    }

    let first = response.offset + 1;
    let last = response.offset + response.results.len();
    lines.push(String::new());
    lines.push(format!(
        "Showing {first}-{last} of {} result(s) in {} ms",
        response.total, response.search_time
    ));
    lines.join("\n")
}

pub(crate) fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Format results for human-readable terminal output.
pub fn format_human(response: &SearchResponse) {
    println!("{}", render_human(response));
}

/// Format results as JSON output.
pub fn format_json(response: &SearchResponse) -> Result<()> {
    println!("{}", serde_json::to_string(response)?);
    Ok(())
}

/// Format results as plain file paths (one per line).
pub fn format_files(response: &SearchResponse, corpus: &ContentDirCorpus) {
    for r in &response.results {
        if let Some(path) = corpus.locate(&r.document.id) {
            println!("{}", path.display());
        }
    }
}
