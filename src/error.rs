//! Error types for outresolve
//!
//! All modules use `ResolveResult<T>` as their return type. A resolution
//! miss is never an error: it is reported as `Ok(None)`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for outresolve operations
pub type ResolveResult<T> = Result<T, ResolveError>;

/// All errors that can occur while resolving artifacts
#[derive(Error, Debug)]
pub enum ResolveError {
    // Remote cache errors
    #[error("Invalid content digest '{0}': expected 64 lowercase hex characters")]
    InvalidDigest(String),

    #[error("Digest mismatch for {path}: expected {expected}, got {actual}")]
    DigestMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Size mismatch for blob {digest}: expected {expected} bytes, found {actual}")]
    SizeMismatch {
        digest: String,
        expected: u64,
        actual: u64,
    },

    #[error("Artifact not found: {0}")]
    NotFound(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid value for config key {key}: {reason}")]
    InvalidConfigValue { key: String, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Manifest errors
    #[error("Invalid artifact manifest {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl ResolveError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the error means the cache holds corrupt or mismatched content
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            Self::DigestMismatch { .. } | Self::SizeMismatch { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::DigestMismatch { .. } | Self::SizeMismatch { .. } => {
                Some("Remove the corrupt blob from the disk cache and rebuild")
            }
            Self::NotFound(_) => {
                Some("Check that the build ran with --disk_cache pointing at cache.cas_dir")
            }
            Self::ConfigInvalid { .. } => Some("Fix the file or run: outresolve config init --force"),
            _ => None,
        }
    }
}
