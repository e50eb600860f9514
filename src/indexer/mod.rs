//! File selection, line-window chunking, and repository parsing
//!
//! Provides functionality to walk a checked-out tree, pick source files by
//! extension, and split each one into overlapping line windows for embedding.

mod chunker;
mod file_walker;
mod language;
pub mod progress;
mod repo_parser;

pub use chunker::{
    ChunkingParams, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP, LineChunker, LineWindows, chunk_file,
};
pub use file_walker::FileWalker;
pub use language::{LanguageTable, UNKNOWN_LANGUAGE};
pub use progress::{NoopObserver, ParseEvent, ParseObserver, TracingObserver};
pub use repo_parser::{ParseReport, RepoParser, parse_repo};

use crate::config::SelectionConfig;
use crate::error::FilesystemError;
use std::path::{Path, PathBuf};

/// Select the files under `root_path` eligible for chunking, using the
/// default allow-list and directory deny-list
pub fn select_files(root_path: &Path) -> Result<Vec<PathBuf>, FilesystemError> {
    FileWalker::new(&SelectionConfig::default()).walk(root_path)
}
