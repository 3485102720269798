//! Remote output cache abstraction
//!
//! Provides a trait for materializing remote build outputs locally, so the
//! resolver can work with different backends:
//! - Bazel `--disk_cache` directories ([`DiskCache`])
//! - In-process fakes in tests

mod disk;

pub use disk::{is_valid_digest, DiskCache};

use crate::artifact::RemoteRef;
use crate::error::ResolveResult;
use crate::session::SessionContext;
use async_trait::async_trait;
use std::path::PathBuf;

/// Abstract remote output cache interface
///
/// Implementations own storage, eviction and locking. They must be safe for
/// concurrent lookups.
#[async_trait]
pub trait RemoteCache: Send + Sync {
    /// Materialize `output` locally for `session`.
    ///
    /// Returns `Ok(None)` when the cache does not hold the output.
    async fn resolve(
        &self,
        session: &SessionContext,
        output: &RemoteRef,
    ) -> ResolveResult<Option<PathBuf>>;

    /// Get the human-readable cache name for display
    fn cache_name(&self) -> &'static str;
}
