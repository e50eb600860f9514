//! repo-chunker CLI
//!
//! ```bash
//! # Chunk a remote repository, one JSON record per line
//! repo-chunker chunk https://github.com/owner/repo.git --format jsonl
//!
//! # Chunk a local directory with smaller windows
//! repo-chunker chunk ./my-project --chunk-size 40 --overlap 5 --output chunks.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use repo_chunker::acquisition::{GitCloner, acquire_source};
use repo_chunker::config::Config;
use repo_chunker::error::ChunkerError;
use repo_chunker::indexer::RepoParser;
use repo_chunker::types::Chunk;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

/// Output encoding for chunk records
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// A single JSON array
    #[default]
    Json,
    /// One JSON object per line
    Jsonl,
}

#[derive(Parser)]
#[command(name = "repo-chunker")]
#[command(about = "Split a repository into overlapping line chunks for embedding")]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Path to a config file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "REPO_CHUNKER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire a repository and write its chunks
    Chunk {
        /// Local directory or git locator (URL or path to a repository)
        source: String,

        /// Lines per chunk
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Lines shared by consecutive chunks
        #[arg(long)]
        overlap: Option<usize>,

        /// Chunk files in parallel
        #[arg(long)]
        parallel: bool,

        /// Skip files larger than this many bytes (0 = unlimited)
        #[arg(long)]
        max_file_size: Option<u64>,

        /// Branch to check out when cloning
        #[arg(short, long)]
        branch: Option<String>,

        /// Output encoding
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave the cloned checkout on disk
        #[arg(long)]
        keep_clone: bool,
    },

    /// Print the JSON schema of a chunk record
    Schema,

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if err
                .downcast_ref::<ChunkerError>()
                .is_some_and(ChunkerError::is_user_error)
            {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Validation waits until CLI flags are layered on top
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Chunk {
            source,
            chunk_size,
            overlap,
            parallel,
            max_file_size,
            branch,
            format,
            output,
            keep_clone,
        } => {
            if let Some(size) = chunk_size {
                config.chunking.chunk_size = size;
            }
            if let Some(overlap) = overlap {
                config.chunking.overlap = overlap;
            }
            if parallel {
                config.parsing.parallel = true;
            }
            if let Some(max) = max_file_size {
                config.parsing.max_file_size = max;
            }
            if branch.is_some() {
                config.acquisition.branch = branch;
            }

            run_chunk(&config, &source, format, output, keep_clone)
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(Chunk);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Commands::Config => {
            config.validate()?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn run_chunk(
    config: &Config,
    source: &str,
    format: OutputFormat,
    output: Option<PathBuf>,
    keep_clone: bool,
) -> Result<()> {
    // Fail on bad chunking parameters before touching the network
    let parser = RepoParser::from_config(config)?;

    let cloner = GitCloner::from_config(&config.acquisition);
    let checkout = acquire_source(&cloner, source).map_err(ChunkerError::from)?;

    let result = parser.parse(checkout.path());

    if keep_clone && checkout.is_owned() {
        let kept = checkout.into_path();
        tracing::info!("Keeping checkout at {}", kept.display());
    } else {
        checkout.release();
    }

    let report = result?;

    let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    write_chunks(BufWriter::new(writer), &report.chunks, format)
}

fn write_chunks<W: Write>(mut writer: W, chunks: &[Chunk], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, chunks)?;
            writeln!(writer)?;
        }
        OutputFormat::Jsonl => {
            for chunk in chunks {
                serde_json::to_writer(&mut writer, chunk)?;
                writeln!(writer)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}
