use std::path::{Path, PathBuf};

/// Environment variables consulted for the content root, highest priority
/// first.
const ENV_VARS: &[&str] = &["DOCFIND_CONTENT_DIR", "CONTENT_DIR"];

/// Directory name used when nothing else is configured.
const DEFAULT_CONTENT_DIR: &str = "content";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDir {
    root: PathBuf,
}

impl ContentDir {
    /// Resolve the content directory from, in order of priority:
    /// 1. An explicit path (from --content-dir)
    /// 2. The DOCFIND_CONTENT_DIR environment variable
    /// 3. The CONTENT_DIR environment variable
    /// 4. `./content`
    ///
    /// The directory is not required to exist.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        Self::resolve_with(explicit, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        explicit: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let root = if let Some(path) = explicit {
            path.to_path_buf()
        } else if let Some(val) = ENV_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .find(|val| !val.trim().is_empty())
        {
            PathBuf::from(val)
        } else {
            PathBuf::from(DEFAULT_CONTENT_DIR)
        };

        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
