//! docfind - full-text search over a directory of markdown documents.
//!
//! Documents are markdown files with optional YAML frontmatter. Every query
//! reads the corpus afresh, counts case-insensitive term occurrences in each
//! title and body, and ranks documents with title hits weighted above body
//! hits. There is no persistent index.
//!
//! # Quick start
//!
//! ```no_run
//! use docfind::{ContentDirCorpus, search::{self, SearchOptions}};
//!
//! let corpus = ContentDirCorpus::new("content");
//! let response =
//!     search::execute_search(&corpus, "getting started", &SearchOptions::default());
//! for r in &response.results {
//!     println!("{} (score: {}) {}", r.document.path, r.score, r.excerpt);
//! }
//! println!("{} total", response.total);
//! ```

pub mod cli;
pub mod content_dir;
pub mod corpus;
pub mod doc_id;
pub mod error;
pub mod frontmatter;
pub mod matcher;
pub mod mcp;
pub mod ranking;
pub mod search;
pub mod text_util;
pub mod walker;

pub use content_dir::ContentDir;
pub use corpus::{
    ContentDirCorpus,
    CorpusProvider,
    DocumentKind,
    InMemoryCorpus,
    SearchableDocument,
};
pub use doc_id::DocumentId;
pub use error::{Error, Result};
pub use matcher::{MatchOutcome, match_text};
pub use ranking::{SearchResult, rank};
pub use search::{SearchOptions, SearchResponse, execute_search};
