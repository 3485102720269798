//! Configuration schema for outresolve
//!
//! Configuration is stored at `~/.config/outresolve/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Remote output cache settings
    pub cache: CacheConfig,

    /// Session defaults
    pub session: SessionConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Remote output cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Bazel `--disk_cache` directory holding `cas/` blobs
    pub cas_dir: PathBuf,

    /// Where remote outputs are materialized, one subdirectory per session
    pub output_dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let cache_root = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            cas_dir: cache_root.join("bazel-disk-cache"),
            output_dir: cache_root.join("outresolve").join("outputs"),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session name, used to scope materialized outputs
    pub name: String,

    /// Workspace root (defaults to the current directory)
    pub workspace_root: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            workspace_root: None,
        }
    }
}
