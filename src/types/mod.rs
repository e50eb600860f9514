use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A contiguous line range of one file, ready for an embedding stage
///
/// Serializes as `{"content": ..., "metadata": {...}}`; the field names and the
/// nesting are the contract downstream consumers rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Chunk {
    /// Literal text of the lines, original line terminators included
    pub content: String,
    /// Where the content came from
    pub metadata: ChunkMetadata,
}

/// Positional and language metadata for a chunk
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ChunkMetadata {
    /// File path relative to the repository root, always `/`-separated
    pub file_path: String,
    /// First line of the chunk (1-indexed, inclusive)
    pub start_line: usize,
    /// Last line of the chunk (1-indexed, inclusive)
    pub end_line: usize,
    /// Language label derived from the file extension, or "Unknown"
    pub language: String,
}

impl Chunk {
    /// Number of source lines covered by this chunk
    pub fn line_count(&self) -> usize {
        self.metadata.end_line + 1 - self.metadata.start_line
    }
}

/// A file that was selected but produced no chunks because it could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkippedFile {
    /// File path relative to the repository root
    pub file_path: String,
    /// Human readable failure reason
    pub reason: String,
}

/// Aggregate counts for one parse invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ParseSummary {
    /// Files returned by the selector
    pub files_visited: usize,
    /// Files that yielded at least one chunk
    pub files_chunked: usize,
    /// Files that could not be read
    pub files_skipped: usize,
    /// Total chunk records produced
    pub chunks_produced: usize,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}
