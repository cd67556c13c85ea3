use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use tracing::{trace, warn};

use crate::error::{Error, Result};

/// A discovered document file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Path relative to the content root directory.
    pub relative_path: PathBuf,
    /// Fully resolved absolute path.
    pub absolute_path: PathBuf,
    /// Last modification time as seconds since the Unix epoch, if the
    /// filesystem reports one.
    pub mtime: Option<u64>,
}

/// Supported file extensions for document discovery.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Recursively walk a directory and discover markdown documents.
///
/// Skips hidden files/directories (names starting with `.`) and only
/// returns files with supported extensions (.md, .mdx).
///
/// Only a failure to enumerate `root` itself is returned as an error.
/// Unreadable subdirectories and entries are logged and skipped.
pub fn discover_files(root: &Path) -> Result<Vec<DiscoveredFile>> {
    let canonical_root = root
        .canonicalize()
        .map_err(|_| Error::ContentDir(root.to_path_buf()))?;
    if !canonical_root.is_dir() {
        return Err(Error::ContentDir(root.to_path_buf()));
    }

    let mut results = Vec::new();
    walk_dir(&canonical_root, &canonical_root, &mut results)?;
    results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(results)
}

fn walk_dir(
    root: &Path,
    current: &Path,
    results: &mut Vec<DiscoveredFile>,
) -> Result<()> {
    let entries = std::fs::read_dir(current)?;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %current.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        // Skip hidden files and directories.
        if name.starts_with('.') {
            trace!(path = %entry.path().display(), "skipping hidden entry");
            continue;
        }

        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "skipping entry");
                continue;
            }
        };

        if file_type.is_dir() {
            if let Err(e) = walk_dir(root, &entry.path(), results) {
                warn!(dir = %entry.path().display(), error = %e, "skipping unreadable directory");
            }
        } else if file_type.is_symlink() {
            // Resolve symlink and check for cycles.
            let resolved = match entry.path().canonicalize() {
                Ok(p) => p,
                Err(_) => continue, // Skip broken symlinks
            };
            if resolved.starts_with(root) && resolved.is_dir() {
                continue;
            }
            if resolved.is_file() && is_supported(&resolved) {
                results.push(make_discovered(root, &entry.path(), &resolved));
            }
        } else if file_type.is_file() && is_supported(&entry.path()) {
            let path = entry.path();
            let abs = path.canonicalize().unwrap_or_else(|_| path.clone());
            results.push(make_discovered(root, &path, &abs));
        }
    }

    Ok(())
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

fn make_discovered(
    root: &Path,
    original_path: &Path,
    absolute_path: &Path,
) -> DiscoveredFile {
    let relative_path = original_path
        .strip_prefix(root)
        .unwrap_or(original_path)
        .to_path_buf();

    let mtime = std::fs::metadata(absolute_path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
        .map(|d| d.as_secs());

    DiscoveredFile {
        relative_path,
        absolute_path: absolute_path.to_path_buf(),
        mtime,
    }
}
