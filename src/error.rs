/// Centralized error types for repo-chunker using thiserror
///
/// Every [`ChunkerError`] aborts a run. Per-file read errors stay
/// [`FileReadError`] values and only cost that file its chunks.
use thiserror::Error;

/// Main error type for the ingestion pipeline
#[derive(Error, Debug)]
pub enum ChunkerError {
    #[error("Acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while materializing a repository locally
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Invalid repository locator: {0:?}")]
    InvalidLocator(String),

    #[error("Failed to clone '{locator}': {reason}")]
    CloneFailed { locator: String, reason: String },

    #[error("Failed to prepare clone directory '{path}': {reason}")]
    WorkspaceFailed { path: String, reason: String },
}

/// Errors raised while traversing the checked-out tree
#[derive(Error, Debug)]
pub enum FilesystemError {
    #[error("Root directory does not exist: {0}")]
    RootNotFound(String),

    #[error("Root path is not a directory: {0}")]
    NotADirectory(String),

    #[error("Failed to walk directory under '{root}': {reason}")]
    WalkFailed { root: String, reason: String },
}

/// Per-file failure; the file contributes zero chunks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileReadError {
    #[error("Failed to read file '{file}': {reason}")]
    ReadFailed { file: String, reason: String },

    #[error("File '{file}' exceeds maximum size: {size} > {max}")]
    TooLarge { file: String, size: u64, max: u64 },
}

/// Errors related to configuration and chunking parameters
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl FileReadError {
    /// Path of the file that failed, relative to the repository root
    pub fn file(&self) -> &str {
        match self {
            FileReadError::ReadFailed { file, .. } | FileReadError::TooLarge { file, .. } => file,
        }
    }
}

impl ChunkerError {
    /// Check if this is a user error (bad input or settings) vs system error
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ChunkerError::Config(ConfigError::InvalidValue { .. })
                | ChunkerError::Acquisition(AcquisitionError::InvalidLocator(_))
                | ChunkerError::Filesystem(FilesystemError::RootNotFound(_))
                | ChunkerError::Filesystem(FilesystemError::NotADirectory(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChunkerError::Filesystem(FilesystemError::RootNotFound("/repo".to_string()));
        assert_eq!(
            err.to_string(),
            "Filesystem error: Root directory does not exist: /repo"
        );
    }

    #[test]
    fn test_is_user_error() {
        let user_err = ChunkerError::Acquisition(AcquisitionError::InvalidLocator("".to_string()));
        assert!(user_err.is_user_error());

        let user_err: ChunkerError = ConfigError::InvalidValue {
            key: "chunking.overlap".to_string(),
            reason: "must be less than chunk_size".to_string(),
        }
        .into();
        assert!(user_err.is_user_error());

        let system_err: ChunkerError = AcquisitionError::CloneFailed {
            locator: "https://example.com/repo.git".to_string(),
            reason: "network unreachable".to_string(),
        }
        .into();
        assert!(!system_err.is_user_error());

        let system_err: ChunkerError = FilesystemError::WalkFailed {
            root: "/repo".to_string(),
            reason: "permission denied".to_string(),
        }
        .into();
        assert!(!system_err.is_user_error());
    }

    #[test]
    fn test_clone_failed_display() {
        let err = AcquisitionError::CloneFailed {
            locator: "https://example.com/repo.git".to_string(),
            reason: "authentication required".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to clone 'https://example.com/repo.git': authentication required"
        );
    }

    #[test]
    fn test_file_read_error_too_large() {
        let err = FileReadError::TooLarge {
            file: "data/big.json".to_string(),
            size: 2048,
            max: 1024,
        };
        assert_eq!(
            err.to_string(),
            "File 'data/big.json' exceeds maximum size: 2048 > 1024"
        );
        assert_eq!(err.file(), "data/big.json");
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            key: "chunking.chunk_size".to_string(),
            reason: "must be greater than 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for 'chunking.chunk_size': must be greater than 0"
        );
    }
}
