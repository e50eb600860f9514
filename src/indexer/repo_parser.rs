use super::chunker::{ChunkingParams, LineChunker};
use super::file_walker::FileWalker;
use super::language::LanguageTable;
use super::progress::{ParseEvent, ParseObserver, TracingObserver};
use crate::config::Config;
use crate::error::{ChunkerError, FileReadError};
use crate::paths::portable_relative_path;
use crate::types::{Chunk, ParseSummary, SkippedFile};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Result of parsing one repository
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    /// Chunks of every file, in selection order
    pub chunks: Vec<Chunk>,
    /// Files that were selected but could not be read
    pub skipped: Vec<SkippedFile>,
    pub summary: ParseSummary,
}

/// Runs the file walker over a tree and chunks every selected file
#[derive(Clone)]
pub struct RepoParser {
    walker: FileWalker,
    chunker: LineChunker,
    parallel: bool,
    observer: Arc<dyn ParseObserver>,
}

impl RepoParser {
    pub fn new(walker: FileWalker, chunker: LineChunker) -> Self {
        Self {
            walker,
            chunker,
            parallel: false,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Build a parser from validated configuration
    pub fn from_config(config: &Config) -> Result<Self, ChunkerError> {
        config.validate()?;

        let chunker = LineChunker::new(config.chunking.params()?)
            .with_languages(LanguageTable::with_overrides(&config.languages))
            .with_max_file_size(config.parsing.max_file_size);

        Ok(Self::new(FileWalker::new(&config.selection), chunker)
            .with_parallel(config.parsing.parallel))
    }

    /// Chunk files on the rayon pool; output order is unchanged
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ParseObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn params(&self) -> ChunkingParams {
        self.chunker.params()
    }

    /// Parse every selected file under `repo_root`
    ///
    /// Traversal failures abort the parse; unreadable files are reported in
    /// [`ParseReport::skipped`] and contribute no chunks.
    pub fn parse(&self, repo_root: &Path) -> Result<ParseReport, ChunkerError> {
        let started = Instant::now();

        let files = self.walker.walk(repo_root)?;
        self.observer
            .on_event(ParseEvent::FilesSelected { total: files.len() });

        let outcomes = self.chunk_all(&files, repo_root);

        let mut report = ParseReport::default();
        report.summary.files_visited = files.len();

        for (path, outcome) in files.iter().zip(outcomes) {
            match outcome {
                Ok(chunks) => {
                    let file_path = portable_relative_path(path, repo_root);
                    self.observer.on_event(ParseEvent::FileChunked {
                        file_path: &file_path,
                        chunks: chunks.len(),
                    });
                    if !chunks.is_empty() {
                        report.summary.files_chunked += 1;
                    }
                    report.chunks.extend(chunks);
                }
                Err(error) => {
                    self.observer.on_event(ParseEvent::FileSkipped {
                        file_path: error.file(),
                        error: &error,
                    });
                    report.skipped.push(SkippedFile {
                        file_path: error.file().to_string(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        report.summary.files_skipped = report.skipped.len();
        report.summary.chunks_produced = report.chunks.len();
        report.summary.duration_ms = started.elapsed().as_millis() as u64;

        self.observer.on_event(ParseEvent::Finished {
            summary: &report.summary,
        });

        Ok(report)
    }

    fn chunk_all(
        &self,
        files: &[PathBuf],
        repo_root: &Path,
    ) -> Vec<Result<Vec<Chunk>, FileReadError>> {
        if self.parallel {
            files
                .par_iter()
                .map(|file| self.chunker.chunk_file(file, repo_root))
                .collect()
        } else {
            files
                .iter()
                .map(|file| self.chunker.chunk_file(file, repo_root))
                .collect()
        }
    }
}

impl Default for RepoParser {
    fn default() -> Self {
        Self::new(FileWalker::default(), LineChunker::default())
    }
}

/// Parse a repository with the default selection and chunking settings
pub fn parse_repo(repo_root: &Path) -> Result<Vec<Chunk>, ChunkerError> {
    Ok(RepoParser::default().parse(repo_root)?.chunks)
}
