use std::fs;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::fs::write_atomic;
use crate::hash::Hash;
use crate::repo::Repo;
use crate::types::Commit;

/// write a commit to the object store
///
/// commits are serialized as CBOR, then zstd compressed. the object is filed
/// under its canonical field hash, not a hash of the stored bytes.
pub fn write_commit(repo: &Repo, commit: &Commit) -> Result<Hash> {
    let hash = commit.hash();
    let path = commit_path(repo, &hash);

    // dedup: if commit already exists, we're done
    if path.exists() {
        return Ok(hash);
    }

    // serialize to cbor
    let mut cbor_bytes = Vec::new();
    ciborium::into_writer(commit, &mut cbor_bytes)?;

    let compressed = zstd::encode_all(&cbor_bytes[..], repo.config().compression_level)
        .map_err(|e| Error::Io {
            path: PathBuf::from("<zstd>"),
            source: e,
        })?;

    write_atomic(repo, &path, &compressed)?;
    tracing::debug!(%hash, message = %commit.message, "stored commit");

    Ok(hash)
}

/// read a commit from the object store
pub fn read_commit(repo: &Repo, hash: &Hash) -> Result<Commit> {
    let path = commit_path(repo, hash);

    let compressed = fs::read(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ObjectNotFound(*hash)
        } else {
            Error::Io {
                path: path.clone(),
                source: e,
            }
        }
    })?;

    // decompress
    let cbor_bytes = zstd::decode_all(&compressed[..]).map_err(|e| Error::Io {
        path: path.clone(),
        source: e,
    })?;

    // deserialize
    let commit: Commit = ciborium::from_reader(&cbor_bytes[..])?;

    // verify hash
    if commit.hash() != *hash {
        return Err(Error::CorruptObject(*hash));
    }

    Ok(commit)
}

/// get the filesystem path to a commit object
pub fn commit_path(repo: &Repo, hash: &Hash) -> PathBuf {
    let (dir, file) = hash.to_path_components();
    repo.commits_path().join(dir).join(file)
}

/// check if a commit exists in the object store
pub fn commit_exists(repo: &Repo, hash: &Hash) -> bool {
    commit_path(repo, hash).exists()
}

/// list every stored commit hash, sorted
pub fn list_commits(repo: &Repo) -> Result<Vec<Hash>> {
    let dir = repo.commits_path();
    let mut hashes = Vec::new();

    if !dir.exists() {
        return Ok(hashes);
    }

    for entry in WalkDir::new(&dir).min_depth(2).max_depth(2).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io {
            path: dir.clone(),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walkdir error")),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let parent_name = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("");

        let hex = format!("{}{}", parent_name, file_name);
        if let Ok(hash) = Hash::from_hex(&hex) {
            hashes.push(hash);
        }
    }

    hashes.sort();
    Ok(hashes)
}

/// resolve a full or abbreviated commit id
///
/// the prefix must match exactly one stored commit; no match and an
/// ambiguous match are both reported as `CommitNotFound`.
pub fn resolve_commit(repo: &Repo, id: &str) -> Result<Hash> {
    let id = id.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::CommitNotFound(id.to_string()));
    }

    // full ids skip the directory scan
    if id.len() == 64 {
        let hash = Hash::from_hex(&id.to_ascii_lowercase())?;
        return if commit_exists(repo, &hash) {
            Ok(hash)
        } else {
            Err(Error::CommitNotFound(id.to_string()))
        };
    }

    let mut matches = list_commits(repo)?.into_iter().filter(|h| h.matches_prefix(id));
    match (matches.next(), matches.next()) {
        (Some(hash), None) => Ok(hash),
        _ => Err(Error::CommitNotFound(id.to_string())),
    }
}
