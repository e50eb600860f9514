//! File selection: directory traversal with a directory deny-list and an
//! extension allow-list

use super::language::normalize_extension;
use crate::config::SelectionConfig;
use crate::error::FilesystemError;
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Walks a checked-out tree and yields the files worth chunking
#[derive(Debug, Clone)]
pub struct FileWalker {
    /// Lowercase extensions without the leading dot
    pub(crate) extensions: HashSet<String>,
    /// Lowercase multi-part suffixes, leading dot included
    pub(crate) compound_extensions: Vec<String>,
    /// Directory names that are pruned wherever they appear
    pub(crate) exclude_dirs: HashSet<String>,
}

impl FileWalker {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            extensions: config
                .extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
            compound_extensions: config
                .compound_extensions
                .iter()
                .map(|suffix| format!(".{}", normalize_extension(suffix)))
                .collect(),
            exclude_dirs: config.exclude_dirs.iter().cloned().collect(),
        }
    }

    /// Walk `root` and collect every eligible file path
    ///
    /// Entries are visited in file-name order, so the result is stable for an
    /// unchanged tree. Unreadable directories abort the walk. Symlinks to
    /// files are selected like regular files; directory symlinks are not
    /// followed.
    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>, FilesystemError> {
        if !root.exists() {
            return Err(FilesystemError::RootNotFound(root.display().to_string()));
        }
        if !root.is_dir() {
            return Err(FilesystemError::NotADirectory(root.display().to_string()));
        }

        let exclude_dirs = self.exclude_dirs.clone();
        let walker = WalkBuilder::new(root)
            .standard_filters(false) // The deny-list is the only filter
            .hidden(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir
                    && entry.depth() > 0
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| exclude_dirs.contains(name)))
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| FilesystemError::WalkFailed {
                root: root.display().to_string(),
                reason: e.to_string(),
            })?;

            let path = entry.path();
            let is_file = match entry.file_type() {
                Some(ft) if ft.is_file() => true,
                Some(ft) if ft.is_symlink() => path.is_file(),
                _ => false,
            };
            if !is_file {
                if entry.path_is_symlink() {
                    tracing::debug!("Not following symlink: {:?}", path);
                }
                continue;
            }

            if self.is_selected(path) {
                files.push(path.to_path_buf());
            } else {
                tracing::trace!("Skipping unsupported file: {:?}", path);
            }
        }

        tracing::debug!("Selected {} files under {}", files.len(), root.display());
        Ok(files)
    }

    /// Check whether a file name passes the extension allow-list
    pub(crate) fn is_selected(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let name = name.to_lowercase();

        if self
            .compound_extensions
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
        {
            return true;
        }

        Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.contains(ext))
    }
}

impl Default for FileWalker {
    fn default() -> Self {
        Self::new(&SelectionConfig::default())
    }
}
