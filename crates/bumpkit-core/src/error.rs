//! Error types for bumpkit

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using BumpkitError
pub type Result<T> = std::result::Result<T, BumpkitError>;

/// Main error type for bumpkit operations
#[derive(Debug, Error)]
pub enum BumpkitError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Manifest-related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// The commit range could not be walked
    #[error("Failed to query commit range {range}: {reason}")]
    RangeQueryFailed { range: String, reason: String },

    /// The changed files of a commit could not be listed
    #[error("Failed to list changed files of commit {hash}: {reason}")]
    ChangedFilesFailed { hash: String, reason: String },

    /// No commits found
    #[error("No commits found in repository")]
    NoCommits,

    /// Tag already exists
    #[error("Tag already exists: {0}")]
    TagExists(String),

    /// Failed to create tag
    #[error("Failed to create tag {name}: {reason}")]
    TagCreationFailed { name: String, reason: String },

    /// Failed to read the current branch
    #[error("Failed to read current branch: {0}")]
    BranchLookupFailed(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Package manifest errors
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The repository root has no manifest
    #[error("Root manifest not found at {0}")]
    RootNotFound(PathBuf),

    /// A manifest exists but could not be read
    #[error("Failed to read manifest {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    /// A manifest exists but is not valid
    #[error("Failed to parse manifest {path}: {reason}")]
    ParseFailed { path: PathBuf, reason: String },
}

/// Failure to expand a workspace pattern into directories
#[derive(Debug, Error)]
#[error("Invalid workspace pattern '{pattern}': {reason}")]
pub struct ExpandError {
    /// The pattern that failed
    pub pattern: String,
    /// Why it failed
    pub reason: String,
}
