//! outresolve - Bazel artifact resolver
//!
//! Resolves build artifacts to local paths an IDE indexer can use. Local
//! artifacts get their execroot external symlinks rewritten to the stable
//! `/external/` location; remote artifacts are materialized through an
//! injected [`RemoteCache`].

pub mod artifact;
pub mod canonicalize;
pub mod cli;
pub mod config;
pub mod decode;
pub mod error;
pub mod remote;
pub mod resolver;
pub mod session;

pub use artifact::{ArtifactLocation, ArtifactRef, RemoteRef};
pub use canonicalize::{canonicalize_external_path, canonicalize_path};
pub use decode::{ArtifactDecoder, WorkspaceDecoder};
pub use error::{ResolveError, ResolveResult};
pub use remote::{DiskCache, RemoteCache};
pub use resolver::ArtifactResolver;
pub use session::SessionContext;
