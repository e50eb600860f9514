//! Repository acquisition: materialize a locator as a local checkout
//!
//! The parser only needs a directory. [`GitCloner`] produces one by cloning
//! with libgit2; [`LocalCheckout::local`] wraps a directory that already exists.

use crate::config::AcquisitionConfig;
use crate::error::AcquisitionError;
use chrono::Utc;
use git2::FetchOptions;
use git2::build::RepoBuilder;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes clones started within the same clock tick
static CLONE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Anything that can turn a repository locator into a local directory
pub trait RepoSource {
    fn acquire(&self, locator: &str) -> Result<LocalCheckout, AcquisitionError>;
}

/// A local tree ready for parsing
#[derive(Debug)]
pub struct LocalCheckout {
    path: PathBuf,
    owned: bool,
}

impl LocalCheckout {
    /// Wrap an existing directory; `release` leaves it in place
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owned: false,
        }
    }

    /// Wrap a directory this process created; `release` removes it
    pub fn owned(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owned: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `release` will delete the directory
    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// Remove an owned checkout. Never fails: a tree that is already partly
    /// or fully gone is fine.
    pub fn release(self) {
        if !self.owned {
            return;
        }

        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!("Removed checkout at {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to remove checkout at {}: {}",
                self.path.display(),
                e
            ),
        }
    }

    /// Keep the directory on disk and hand back its path
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Clones repositories with libgit2 into a per-run directory
#[derive(Debug, Clone)]
pub struct GitCloner {
    clone_root: PathBuf,
    branch: Option<String>,
    shallow: bool,
}

impl GitCloner {
    pub fn new(clone_root: impl Into<PathBuf>) -> Self {
        Self {
            clone_root: clone_root.into(),
            branch: None,
            shallow: false,
        }
    }

    pub fn from_config(config: &AcquisitionConfig) -> Self {
        Self::new(&config.clone_root)
            .with_branch(config.branch.clone())
            .with_shallow(config.shallow)
    }

    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    /// Fetch only the tip commit (not supported for local-path locators)
    pub fn with_shallow(mut self, shallow: bool) -> Self {
        self.shallow = shallow;
        self
    }

    pub fn clone_root(&self) -> &Path {
        &self.clone_root
    }

    /// Fresh destination directory for `locator`
    fn destination(&self, locator: &str) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%d%H%M%S%f");
        let sequence = CLONE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        self.clone_root
            .join(format!("{}-{}-{}", short_hash(locator), stamp, sequence))
    }
}

impl RepoSource for GitCloner {
    fn acquire(&self, locator: &str) -> Result<LocalCheckout, AcquisitionError> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(AcquisitionError::InvalidLocator(locator.to_string()));
        }

        std::fs::create_dir_all(&self.clone_root).map_err(|e| {
            AcquisitionError::WorkspaceFailed {
                path: self.clone_root.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let dest = self.destination(locator);
        tracing::info!("Cloning {} into {}", locator, dest.display());

        let mut fetch_options = FetchOptions::new();
        if self.shallow {
            fetch_options.depth(1);
        }

        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_options);
        if let Some(branch) = &self.branch {
            builder.branch(branch);
        }

        if let Err(e) = builder.clone(locator, &dest) {
            // Don't leave a half-written tree behind
            LocalCheckout::owned(&dest).release();
            return Err(AcquisitionError::CloneFailed {
                locator: locator.to_string(),
                reason: e.message().to_string(),
            });
        }

        tracing::info!("Clone complete");
        Ok(LocalCheckout::owned(dest))
    }
}

/// Resolve a CLI-style source: an existing directory is used in place,
/// anything else is handed to `source`
pub fn acquire_source(
    source: &dyn RepoSource,
    locator: &str,
) -> Result<LocalCheckout, AcquisitionError> {
    let path = Path::new(locator);
    if !looks_like_url(locator) && path.is_dir() {
        tracing::debug!("Using local directory {}", path.display());
        return Ok(LocalCheckout::local(path));
    }
    source.acquire(locator)
}

fn looks_like_url(locator: &str) -> bool {
    locator.contains("://") || locator.starts_with("git@")
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())[..12].to_string()
}
