//! Disk-backed remote output cache
//!
//! Reads blobs from a Bazel `--disk_cache` directory, laid out as
//! `cas/<first two hex chars>/<sha256>`, and materializes them under a
//! session-scoped output directory with their original file name:
//!
//! ```text
//! <output_dir>/<session>/<digest>/<file name>
//! ```
//!
//! Content is verified against its digest on every copy. Files already
//! materialized with the expected size are reused without copying.

use crate::artifact::RemoteRef;
use crate::error::{ResolveError, ResolveResult};
use crate::remote::RemoteCache;
use crate::session::SessionContext;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Distinguishes staging files of concurrent copies within one process
static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Check that a digest is a lowercase hex SHA-256
pub fn is_valid_digest(digest: &str) -> bool {
    digest.len() == 64
        && digest
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Remote cache backed by a local content-addressed directory
#[derive(Debug, Clone)]
pub struct DiskCache {
    cas_dir: PathBuf,
    output_dir: PathBuf,
}

impl DiskCache {
    /// Create a cache reading from `cas_dir` and materializing into `output_dir`
    pub fn new(cas_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            cas_dir: cas_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Location of a blob in the content-addressed store
    pub fn blob_path(&self, digest: &str) -> PathBuf {
        let shard = digest.get(..2).unwrap_or(digest);
        self.cas_dir.join("cas").join(shard).join(digest)
    }

    /// Where `output` is materialized for `session`
    pub fn materialized_path(&self, session: &SessionContext, output: &RemoteRef) -> PathBuf {
        let file_name = match output.file_name() {
            "." | ".." => output.digest.as_str(),
            name => name,
        };
        self.session_dir(session)
            .join(&output.digest)
            .join(file_name)
    }

    /// Directory holding everything materialized for `session`
    pub fn session_dir(&self, session: &SessionContext) -> PathBuf {
        self.output_dir.join(session.dir_name())
    }

    async fn copy_verified(&self, blob: &Path, target: &Path, expected: &str) -> ResolveResult<()> {
        let parent = target.parent().unwrap_or(&self.output_dir);
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ResolveError::io(format!("creating directory {}", parent.display()), e))?;

        let staging = parent.join(format!(
            ".staging-{}-{}",
            std::process::id(),
            STAGING_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let actual = match stream_and_hash(blob, &staging).await {
            Ok(actual) => actual,
            Err(e) => {
                let _ = fs::remove_file(&staging).await;
                return Err(e);
            }
        };

        if actual != expected {
            let _ = fs::remove_file(&staging).await;
            return Err(ResolveError::DigestMismatch {
                path: blob.to_path_buf(),
                expected: expected.to_string(),
                actual,
            });
        }

        fs::rename(&staging, target).await.map_err(|e| {
            ResolveError::io(format!("moving blob into place at {}", target.display()), e)
        })
    }
}

/// Copy `source` to `dest`, returning the hex SHA-256 of what was copied
async fn stream_and_hash(source: &Path, dest: &Path) -> ResolveResult<String> {
    let mut reader = fs::File::open(source)
        .await
        .map_err(|e| ResolveError::io(format!("opening blob {}", source.display()), e))?;
    let mut writer = fs::File::create(dest)
        .await
        .map_err(|e| ResolveError::io(format!("creating {}", dest.display()), e))?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let n = reader
            .read(&mut buf)
            .await
            .map_err(|e| ResolveError::io(format!("reading blob {}", source.display()), e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        writer
            .write_all(&buf[..n])
            .await
            .map_err(|e| ResolveError::io(format!("writing {}", dest.display()), e))?;
    }

    writer
        .flush()
        .await
        .map_err(|e| ResolveError::io(format!("flushing {}", dest.display()), e))?;

    Ok(hex::encode(hasher.finalize()))
}

/// File length, or `None` if nothing exists at `path`
async fn file_len(path: &Path) -> ResolveResult<Option<u64>> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ResolveError::io(format!("inspecting {}", path.display()), e)),
    }
}

#[async_trait]
impl RemoteCache for DiskCache {
    async fn resolve(
        &self,
        session: &SessionContext,
        output: &RemoteRef,
    ) -> ResolveResult<Option<PathBuf>> {
        if !is_valid_digest(&output.digest) {
            return Err(ResolveError::InvalidDigest(output.digest.clone()));
        }

        let blob = self.blob_path(&output.digest);
        let Some(blob_len) = file_len(&blob).await? else {
            debug!("Cache miss for {}: no blob at {}", output, blob.display());
            return Ok(None);
        };

        if let Some(expected) = output.size_bytes {
            if expected != blob_len {
                return Err(ResolveError::SizeMismatch {
                    digest: output.digest.clone(),
                    expected,
                    actual: blob_len,
                });
            }
        }

        let target = self.materialized_path(session, output);
        if file_len(&target).await? == Some(blob_len) {
            debug!("Reusing materialized {}", target.display());
            return Ok(Some(target));
        }

        self.copy_verified(&blob, &target, &output.digest).await?;
        info!("Materialized {} at {}", output, target.display());
        Ok(Some(target))
    }

    fn cache_name(&self) -> &'static str {
        "disk"
    }
}
