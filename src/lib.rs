//! # repo-chunker - Repository ingestion for embedding pipelines
//!
//! Turns a source repository into overlapping, line-bounded text chunks
//! annotated with file and language metadata.
//!
//! ## Overview
//!
//! Ingestion runs in three steps:
//!
//! ```text
//! locator ──► Acquisition ──► local dir ──► FileWalker ──► LineChunker (per file) ──► Vec<Chunk>
//!             (git2 clone)                  (allow-list,    (60-line windows,
//!                                            deny-list)      10-line overlap)
//! ```
//!
//! Each [`types::Chunk`] serializes as
//! `{"content": ..., "metadata": {"file_path", "start_line", "end_line", "language"}}`.
//!
//! ## Modules
//!
//! - [`acquisition`]: clone a repository locator into a local checkout
//! - [`indexer`]: file selection, line-window chunking, and repository parsing
//! - [`config`]: configuration management with environment variable support
//! - [`types`]: the chunk record and parse summaries
//! - [`error`]: error types
//! - [`paths`]: platform directories and portable relative paths
//!
//! ## Usage Example
//!
//! ```no_run
//! use repo_chunker::config::Config;
//! use repo_chunker::indexer::RepoParser;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::new()?;
//!     let report = RepoParser::from_config(&config)?.parse(Path::new("."))?;
//!
//!     for chunk in &report.chunks {
//!         println!(
//!             "{}:{}-{} ({})",
//!             chunk.metadata.file_path,
//!             chunk.metadata.start_line,
//!             chunk.metadata.end_line,
//!             chunk.metadata.language
//!         );
//!     }
//!     Ok(())
//! }
//! ```

/// Repository acquisition via libgit2
pub mod acquisition;

/// Configuration management with environment variable overrides
pub mod config;

/// Error types and utilities
pub mod error;

/// File selection, chunking, and repository parsing
pub mod indexer;

/// Path normalization and utility functions
pub mod paths;

/// Chunk record and parse summary types
pub mod types;
