//! Parse progress reporting
//!
//! The parser emits [`ParseEvent`]s to an injected [`ParseObserver`] instead
//! of printing

use crate::error::FileReadError;
use crate::types::ParseSummary;

/// A single progress event for one parse invocation
#[derive(Debug, Clone, Copy)]
pub enum ParseEvent<'a> {
    /// The selector finished; `total` files will be chunked
    FilesSelected { total: usize },
    /// A file was read and chunked
    FileChunked { file_path: &'a str, chunks: usize },
    /// A file could not be read and contributes no chunks
    FileSkipped {
        file_path: &'a str,
        error: &'a FileReadError,
    },
    /// All files have been processed
    Finished { summary: &'a ParseSummary },
}

/// Receives parse events inline on the parsing thread
pub trait ParseObserver: Send + Sync {
    fn on_event(&self, event: ParseEvent<'_>);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn on_event(&self, event: ParseEvent<'_>) {
        match event {
            ParseEvent::FilesSelected { total } => {
                tracing::debug!("Selected {} files for chunking", total);
            }
            ParseEvent::FileChunked { file_path, chunks } => {
                tracing::debug!("Chunked {} into {} chunks", file_path, chunks);
            }
            ParseEvent::FileSkipped { file_path, error } => {
                tracing::warn!("Could not read {}: {}", file_path, error);
            }
            ParseEvent::Finished { summary } => {
                tracing::info!(
                    files_visited = summary.files_visited,
                    files_skipped = summary.files_skipped,
                    chunks_produced = summary.chunks_produced,
                    duration_ms = summary.duration_ms,
                    "Parsed {} files into {} chunks",
                    summary.files_visited,
                    summary.chunks_produced
                );
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ParseObserver for NoopObserver {
    fn on_event(&self, _event: ParseEvent<'_>) {}
}
