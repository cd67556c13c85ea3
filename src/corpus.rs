//! The document corpus searched by the query engine.
//!
//! A [`CorpusProvider`] returns a fresh snapshot of every searchable document
//! each time it is asked. [`ContentDirCorpus`] reads markdown files from a
//! content directory; [`InMemoryCorpus`] serves a fixed list.

use std::{collections::HashSet, path::PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, macros::format_description};
use tracing::warn;

use crate::{
    doc_id::DocumentId,
    error::{Error, Result},
    frontmatter,
    walker::{self, DiscoveredFile, SUPPORTED_EXTENSIONS},
};

/// The kind of entry a searchable document represents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A whole page. Every file loaded from disk is a page.
    #[default]
    Page,
    Heading,
    Text,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Heading => "heading",
            Self::Text => "text",
        }
    }
}

/// A document as seen by the search engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableDocument {
    /// Content-relative path without extension, e.g. `guides/setup`.
    pub id: String,
    pub title: String,
    /// Markdown body with any frontmatter removed.
    pub body: String,
    /// Route for the document, always starting with `/`.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    /// Modification date as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl SearchableDocument {
    /// Build a page whose route is derived from `id`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let path = format!("/{}", id.trim_start_matches('/'));
        Self {
            id,
            title: title.into(),
            body: body.into(),
            path,
            kind: DocumentKind::Page,
            last_modified: None,
        }
    }
}

/// Source of the documents a query runs against.
///
/// Implementations return the current state of their backing store on every
/// call. An `Err` means the corpus as a whole could not be read; failures
/// limited to individual documents are expected to be skipped instead.
pub trait CorpusProvider {
    fn load(&self) -> Result<Vec<SearchableDocument>>;
}

/// A fixed set of documents, returned in the order given.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    documents: Vec<SearchableDocument>,
}

impl InMemoryCorpus {
    pub fn new(documents: Vec<SearchableDocument>) -> Self {
        Self { documents }
    }
}

impl CorpusProvider for InMemoryCorpus {
    fn load(&self) -> Result<Vec<SearchableDocument>> {
        Ok(self.documents.clone())
    }
}

/// Markdown files under a content directory.
#[derive(Debug, Clone)]
pub struct ContentDirCorpus {
    root: PathBuf,
}

impl ContentDirCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the file backing the document with the given id.
    pub fn locate(&self, id: &str) -> Option<PathBuf> {
        SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{id}.{ext}")))
            .find(|path| path.is_file())
    }
}

impl CorpusProvider for ContentDirCorpus {
    fn load(&self) -> Result<Vec<SearchableDocument>> {
        let files = unique_by_id(walker::discover_files(&self.root)?);

        // Read in parallel; collect keeps discovery order.
        let documents = files
            .par_iter()
            .filter_map(|file| match load_document(file) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(
                        path = %file.absolute_path.display(),
                        error = %e,
                        "skipping document"
                    );
                    None
                }
            })
            .collect();

        Ok(documents)
    }
}

/// Drop files whose id was already claimed by an earlier file.
///
/// Discovery is sorted, so `intro.md` wins over `intro.mdx`. This is also
/// the file [`ContentDirCorpus::locate`] resolves to.
fn unique_by_id(files: Vec<DiscoveredFile>) -> Vec<DiscoveredFile> {
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|file| {
            // Files without an id fail later in `load_document`.
            let Some(id) = DocumentId::from_relative_path(&file.relative_path)
            else {
                return true;
            };
            if seen.contains(&id) {
                warn!(
                    id = id.as_str(),
                    path = %file.absolute_path.display(),
                    "skipping document with duplicate id"
                );
                return false;
            }
            seen.insert(id)
        })
        .collect()
}

/// Keep the documents whose id matches a glob pattern.
///
/// `None` keeps everything.
pub fn select(
    documents: Vec<SearchableDocument>,
    pattern: Option<&str>,
) -> Result<Vec<SearchableDocument>> {
    let Some(pattern) = pattern else {
        return Ok(documents);
    };
    let glob = globset::Glob::new(pattern)
        .map_err(|e| Error::Config(format!("invalid glob pattern: {e}")))?
        .compile_matcher();

    Ok(documents
        .into_iter()
        .filter(|doc| glob.is_match(&doc.id))
        .collect())
}

/// Read and parse a single discovered file.
pub fn load_document(file: &DiscoveredFile) -> Result<SearchableDocument> {
    let content = std::fs::read_to_string(&file.absolute_path)?;
    let (frontmatter, body) = frontmatter::parse(&content)?;

    let id = DocumentId::from_relative_path(&file.relative_path).ok_or_else(
        || {
            Error::Config(format!(
                "cannot derive a document id from {}",
                file.relative_path.display()
            ))
        },
    )?;

    let title = frontmatter.title.unwrap_or_else(|| {
        file.relative_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.to_string())
    });

    Ok(SearchableDocument {
        path: id.route(),
        id: id.to_string(),
        title,
        body: body.to_string(),
        kind: DocumentKind::Page,
        last_modified: file.mtime.and_then(format_day),
    })
}

fn format_day(unix_secs: u64) -> Option<String> {
    let secs = i64::try_from(unix_secs).ok()?;
    OffsetDateTime::from_unix_timestamp(secs)
        .ok()?
        .format(format_description!("[year]-[month]-[day]"))
        .ok()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn loads_frontmatter_title_and_body() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "guides/setup.md",
            b"---\ntitle: Setup Guide\n---\nInstall the thing.",
        );

        let docs = ContentDirCorpus::new(tmp.path()).load().unwrap();
        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.id, "guides/setup");
        assert_eq!(doc.path, "/guides/setup");
        assert_eq!(doc.title, "Setup Guide");
        assert_eq!(doc.body, "Install the thing.");
        assert_eq!(doc.kind, DocumentKind::Page);
    }

    #[test]
    fn title_falls_back_to_file_stem() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "quick-start.mdx", b"# Heading\nbody");

        let docs = ContentDirCorpus::new(tmp.path()).load().unwrap();
        assert_eq!(docs[0].title, "quick-start");
        assert_eq!(docs[0].body, "# Heading\nbody");
    }

    #[test]
    fn last_modified_is_a_day() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.md", b"a");

        let docs = ContentDirCorpus::new(tmp.path()).load().unwrap();
        let day = docs[0].last_modified.as_deref().expect("mtime");
        assert_eq!(day.len(), 10);
        assert_eq!(day.as_bytes()[4], b'-');
        assert_eq!(day.as_bytes()[7], b'-');
    }

    #[test]
    fn broken_documents_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "bad-yaml.md", b"---\ntitle: [oops\n---\nbody");
        write(tmp.path(), "binary.md", &[0xff, 0xfe, 0x00, 0x80]);
        write(tmp.path(), "good.md", b"fine");

        let docs = ContentDirCorpus::new(tmp.path()).load().unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["good"]);
    }

    #[test]
    fn keeps_discovery_order() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["c.md", "a.md", "b/z.md", "b/a.md"] {
            write(tmp.path(), name, b"x");
        }

        let docs = ContentDirCorpus::new(tmp.path()).load().unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b/a", "b/z", "c"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let corpus = ContentDirCorpus::new(tmp.path().join("gone"));
        assert!(corpus.load().is_err());
    }

    #[test]
    fn locate_finds_either_extension() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "guides/page.mdx", b"x");
        let corpus = ContentDirCorpus::new(tmp.path());

        assert_eq!(
            corpus.locate("guides/page"),
            Some(tmp.path().join("guides/page.mdx"))
        );
        assert!(corpus.locate("guides/missing").is_none());
    }

    #[test]
    fn same_stem_keeps_markdown_over_mdx() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "intro.md", b"md intro");
        write(tmp.path(), "intro.mdx", b"mdx intro");
        write(tmp.path(), "guides/intro.mdx", b"nested");

        let corpus = ContentDirCorpus::new(tmp.path());
        let docs = corpus.load().unwrap();
        let loaded: Vec<_> = docs
            .iter()
            .map(|d| (d.id.as_str(), d.body.as_str()))
            .collect();
        assert_eq!(
            loaded,
            vec![("guides/intro", "nested"), ("intro", "md intro")]
        );
        assert_eq!(corpus.locate("intro"), Some(tmp.path().join("intro.md")));
    }

    #[test]
    fn in_memory_corpus_returns_documents_in_order() {
        let corpus = InMemoryCorpus::new(vec![
            SearchableDocument::new("b", "B", "second"),
            SearchableDocument::new("a", "A", "first"),
        ]);
        let docs = corpus.load().unwrap();
        assert_eq!(docs[0].id, "b");
        assert_eq!(docs[1].path, "/a");
    }

    #[test]
    fn select_filters_by_glob() {
        let docs = vec![
            SearchableDocument::new("guides/setup", "Setup", ""),
            SearchableDocument::new("guides/deep/tuning", "Tuning", ""),
            SearchableDocument::new("faq", "FAQ", ""),
        ];

        let all = select(docs.clone(), None).unwrap();
        assert_eq!(all.len(), 3);

        let guides = select(docs.clone(), Some("guides/**")).unwrap();
        let ids: Vec<_> = guides.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["guides/setup", "guides/deep/tuning"]);

        assert!(matches!(
            select(docs, Some("[unclosed")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn kind_serializes_as_type() {
        let doc = SearchableDocument::new("x", "X", "body");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "page");
        assert!(json.get("lastModified").is_none());
    }
}
