/// Configuration system for repo-chunker
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables > Config file > Defaults
use crate::error::{ChunkerError, ConfigError};
use crate::indexer::ChunkingParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Window size and overlap
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Which files are eligible for chunking
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Extension -> language label overrides, merged over the built-in table
    #[serde(default)]
    pub languages: BTreeMap<String, String>,

    /// Orchestration options
    #[serde(default)]
    pub parsing: ParsingConfig,

    /// Where and how repositories are cloned
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
}

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Lines per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Lines repeated between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

/// File selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Allowed extensions, matched case-insensitively against the final suffix
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Multi-part suffixes matched against the whole file name (e.g. ".env.example")
    #[serde(default = "default_compound_extensions")]
    pub compound_extensions: Vec<String>,

    /// Directory names that are never descended into
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

/// Parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ParsingConfig {
    /// Chunk files on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,

    /// Skip files larger than this many bytes (0 = unlimited)
    #[serde(default)]
    pub max_file_size: u64,
}

/// Acquisition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Parent directory for fresh clones
    #[serde(default = "default_clone_root")]
    pub clone_root: PathBuf,

    /// Branch to check out instead of the remote HEAD
    #[serde(default)]
    pub branch: Option<String>,

    /// Fetch only the tip commit
    #[serde(default)]
    pub shallow: bool,
}

fn default_chunk_size() -> usize {
    60
}

fn default_overlap() -> usize {
    10
}

fn default_extensions() -> Vec<String> {
    [
        "py", "js", "ts", "jsx", "tsx", "java", "cpp", "c", "cs", "go", "rs", "rb", "php",
        "swift", "kt", "md", "json", "yaml", "yml", "toml",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_compound_extensions() -> Vec<String> {
    vec![".env.example".to_string()]
}

fn default_exclude_dirs() -> Vec<String> {
    [
        ".git",
        "node_modules",
        "__pycache__",
        ".venv",
        "venv",
        "dist",
        "build",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_clone_root() -> PathBuf {
    crate::paths::PlatformPaths::default_clone_root()
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            compound_extensions: default_compound_extensions(),
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            clone_root: default_clone_root(),
            branch: None,
            shallow: false,
        }
    }
}

impl ChunkingConfig {
    /// Validated window parameters
    pub fn params(&self) -> Result<ChunkingParams, ConfigError> {
        ChunkingParams::new(self.chunk_size, self.overlap)
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, ChunkerError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ChunkerError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ChunkerError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ChunkerError> {
        self.chunking.params()?;

        if self.selection.extensions.is_empty() && self.selection.compound_extensions.is_empty()
        {
            return Err(ConfigError::InvalidValue {
                key: "selection.extensions".to_string(),
                reason: "at least one extension must be allowed".to_string(),
            }
            .into());
        }

        if let Some(blank) = self
            .selection
            .extensions
            .iter()
            .chain(&self.selection.compound_extensions)
            .find(|ext| ext.trim_start_matches('.').trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                key: "selection.extensions".to_string(),
                reason: format!("blank extension {:?}", blank),
            }
            .into());
        }

        if self.acquisition.branch.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "acquisition.branch".to_string(),
                reason: "must not be empty when set".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("REPO_CHUNKER_CHUNK_SIZE")
            && let Ok(size) = value.parse()
        {
            self.chunking.chunk_size = size;
        }

        if let Ok(value) = std::env::var("REPO_CHUNKER_OVERLAP")
            && let Ok(overlap) = value.parse()
        {
            self.chunking.overlap = overlap;
        }

        if let Ok(value) = std::env::var("REPO_CHUNKER_PARALLEL")
            && let Ok(parallel) = value.parse()
        {
            self.parsing.parallel = parallel;
        }

        if let Ok(value) = std::env::var("REPO_CHUNKER_MAX_FILE_SIZE")
            && let Ok(max) = value.parse()
        {
            self.parsing.max_file_size = max;
        }

        if let Ok(path) = std::env::var("REPO_CHUNKER_CLONE_ROOT") {
            self.acquisition.clone_root = PathBuf::from(path);
        }

        if let Ok(branch) = std::env::var("REPO_CHUNKER_BRANCH") {
            self.acquisition.branch = Some(branch);
        }
    }

    /// Layer defaults, a config file and environment overrides without
    /// validating
    ///
    /// `path` falls back to the platform config file when it exists. Callers
    /// that add further overrides validate once they are done.
    pub fn load(path: Option<&Path>) -> Result<Self, ChunkerError> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => {
                let default_path = crate::paths::PlatformPaths::default_config_path();
                if default_path.exists() {
                    tracing::info!("Loading config from: {}", default_path.display());
                    Self::read_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Create a new Config with defaults and environment overrides
    pub fn new() -> Result<Self, ChunkerError> {
        let config = Self::load(None)?;
        config.validate()?;
        Ok(config)
    }
}
