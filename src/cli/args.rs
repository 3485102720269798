//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// outresolve - Bazel artifact resolver
///
/// Resolves build artifacts to stable local paths, materializing remote
/// outputs from a disk cache on demand.
#[derive(Parser, Debug)]
#[command(name = "outresolve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "OUTRESOLVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format (overrides general.log_format)
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve every artifact in a manifest, skipping unresolvable ones
    Resolve(ResolveArgs),

    /// Resolve a single artifact, failing if it cannot be resolved
    ResolveOne(ResolveOneArgs),

    /// Rewrite execroot external symlink paths to their stable form
    Canonicalize(CanonicalizeArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Session selection shared by resolving commands
#[derive(Parser, Debug)]
pub struct SessionArgs {
    /// Session name (overrides session.name)
    #[arg(short, long)]
    pub session: Option<String>,

    /// Workspace root (overrides session.workspace_root)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// JSON manifest: an array of artifact references
    pub manifest: PathBuf,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments for the resolve-one command
#[derive(Parser, Debug)]
pub struct ResolveOneArgs {
    /// Artifact reference as JSON, e.g. '{"kind":"local","path":"/a/b"}'
    pub artifact: String,

    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the canonicalize command
#[derive(Parser, Debug)]
pub struct CanonicalizeArgs {
    /// Paths to canonicalize
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.cas_dir)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for resolved paths
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Simple text (one per line)
    Plain,
    /// JSON array
    Json,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Parse the config file spelling, falling back to text
    pub fn from_config(value: &str) -> Self {
        match value {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}
