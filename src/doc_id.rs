use std::path::{Component, Path};

/// A stable document identifier derived from a content-relative path.
///
/// The identifier is the relative path with `/` separators and without the
/// file extension, e.g. `guides/setup.md` becomes `guides/setup`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Derive the identifier for a path relative to the content root.
    ///
    /// Returns `None` when the path has no file name.
    pub fn from_relative_path(relative_path: &Path) -> Option<Self> {
        let stem = relative_path.file_stem()?.to_string_lossy();
        let parent = relative_path.parent().unwrap_or(Path::new(""));

        let mut segments: Vec<String> = parent
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        segments.push(stem.into_owned());

        Some(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The route-usable location of the document, always starting with `/`.
    pub fn route(&self) -> String {
        format!("/{}", self.0)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
