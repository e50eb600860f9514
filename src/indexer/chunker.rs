use super::language::LanguageTable;
use crate::error::{ConfigError, FileReadError};
use crate::paths::portable_relative_path;
use crate::types::{Chunk, ChunkMetadata};
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Default number of lines per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 60;

/// Default number of lines shared by consecutive chunks
pub const DEFAULT_OVERLAP: usize = 10;

/// Validated sliding window parameters
///
/// `chunk_size >= 1` and `overlap < chunk_size` always hold, so the window
/// advances by at least one line per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingParams {
    chunk_size: usize,
    overlap: usize,
}

impl ChunkingParams {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "chunking.chunk_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if overlap >= chunk_size {
            return Err(ConfigError::InvalidValue {
                key: "chunking.overlap".to_string(),
                reason: format!(
                    "must be less than chunk_size ({}), got {}",
                    chunk_size, overlap
                ),
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Lines the window advances between chunks
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Windows over a file of `total_lines` lines
    pub fn windows(&self, total_lines: usize) -> LineWindows {
        LineWindows {
            next_start: Some(0).filter(|_| total_lines > 0),
            total_lines,
            chunk_size: self.chunk_size,
            step: self.step(),
        }
    }
}

impl Default for ChunkingParams {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

/// Iterator over 0-indexed, half-open line windows
///
/// Stops after the first window that reaches the last line, so no trailing
/// window is ever contained in its predecessor.
#[derive(Debug, Clone)]
pub struct LineWindows {
    next_start: Option<usize>,
    total_lines: usize,
    chunk_size: usize,
    step: usize,
}

impl Iterator for LineWindows {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start?;
        let end = (start + self.chunk_size).min(self.total_lines);

        self.next_start = if end >= self.total_lines {
            None
        } else {
            Some(start + self.step)
        };

        Some(start..end)
    }
}

/// Splits files into fixed-size, overlapping line windows
#[derive(Debug, Clone, Default)]
pub struct LineChunker {
    params: ChunkingParams,
    languages: LanguageTable,
    max_file_size: Option<u64>,
}

impl LineChunker {
    pub fn new(params: ChunkingParams) -> Self {
        Self {
            params,
            languages: LanguageTable::default(),
            max_file_size: None,
        }
    }

    pub fn with_languages(mut self, languages: LanguageTable) -> Self {
        self.languages = languages;
        self
    }

    /// Refuse files larger than `max` bytes (0 disables the cap)
    pub fn with_max_file_size(mut self, max: u64) -> Self {
        self.max_file_size = (max > 0).then_some(max);
        self
    }

    pub fn params(&self) -> ChunkingParams {
        self.params
    }

    /// Read one file and chunk it
    ///
    /// Invalid UTF-8 is replaced rather than rejected; any other read failure
    /// is returned so the caller can record the skipped file.
    pub fn chunk_file(&self, path: &Path, repo_root: &Path) -> Result<Vec<Chunk>, FileReadError> {
        let relative_path = portable_relative_path(path, repo_root);

        if let Some(max) = self.max_file_size {
            let size = fs::metadata(path)
                .map_err(|e| FileReadError::ReadFailed {
                    file: relative_path.clone(),
                    reason: e.to_string(),
                })?
                .len();
            if size > max {
                return Err(FileReadError::TooLarge {
                    file: relative_path,
                    size,
                    max,
                });
            }
        }

        let bytes = fs::read(path).map_err(|e| FileReadError::ReadFailed {
            file: relative_path.clone(),
            reason: e.to_string(),
        })?;
        let text = String::from_utf8_lossy(&bytes);

        let language = self.languages.detect_path(path);
        Ok(self.chunk_text(&text, &relative_path, language))
    }

    /// Chunk already-decoded text
    pub fn chunk_text(&self, text: &str, file_path: &str, language: &str) -> Vec<Chunk> {
        let lines: Vec<&str> = text.split_inclusive('\n').collect();

        self.params
            .windows(lines.len())
            .map(|window| Chunk {
                content: lines[window.clone()].concat(),
                metadata: ChunkMetadata {
                    file_path: file_path.to_string(),
                    start_line: window.start + 1,
                    end_line: window.end,
                    language: language.to_string(),
                },
            })
            .collect()
    }
}

/// Chunk a single file with default language detection
///
/// Parameters are validated before the file is touched. A file that cannot be
/// read is logged and yields no chunks.
pub fn chunk_file(
    path: &Path,
    repo_root: &Path,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<Chunk>, ConfigError> {
    let chunker = LineChunker::new(ChunkingParams::new(chunk_size, overlap)?);

    match chunker.chunk_file(path, repo_root) {
        Ok(chunks) => Ok(chunks),
        Err(e) => {
            tracing::warn!("Could not read {}: {}", path.display(), e);
            Ok(Vec::new())
        }
    }
}
