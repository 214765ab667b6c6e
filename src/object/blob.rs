use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::fs::write_atomic;
use crate::hash::{compute_blob_hash, Hash};
use crate::repo::Repo;

/// write a blob to the object store
///
/// returns the blob hash, which can be used to reference this blob.
/// storing content that is already present is a no-op.
pub fn write_blob(repo: &Repo, content: &[u8]) -> Result<Hash> {
    let hash = compute_blob_hash(content);
    let path = blob_path(repo, &hash);

    // deduplication: if blob already exists, we're done
    if path.exists() {
        return Ok(hash);
    }

    write_atomic(repo, &path, content)?;
    tracing::debug!(%hash, len = content.len(), "stored blob");

    Ok(hash)
}

/// get the filesystem path to a blob
pub fn blob_path(repo: &Repo, hash: &Hash) -> PathBuf {
    let (dir, file) = hash.to_path_components();
    repo.blobs_path().join(dir).join(file)
}

/// check if a blob exists in the object store
pub fn blob_exists(repo: &Repo, hash: &Hash) -> bool {
    blob_path(repo, hash).exists()
}

/// read blob content
pub fn read_blob(repo: &Repo, hash: &Hash) -> Result<Vec<u8>> {
    let path = blob_path(repo, hash);
    fs::read(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ObjectNotFound(*hash)
        } else {
            Error::Io { path, source: e }
        }
    })
}
