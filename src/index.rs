//! staging area
//!
//! each staged path is one file under `.twig/index/`, named by the SHA-256 of
//! the path so that path length never meets file-name limits. an entry holds
//! the path and a copy of the content to be committed:
//!
//!   path_len: 4 bytes LE
//!   path: bytes
//!   content: rest of the file
//!
//! entries live outside the object store until a commit turns them into blobs.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, Result};
use crate::fs::write_atomic;
use crate::hash::compute_blob_hash;
use crate::repo::Repo;

fn entry_path(repo: &Repo, path: &str) -> PathBuf {
    repo.index_path().join(compute_blob_hash(path.as_bytes()).to_hex())
}

fn encode_entry(path: &str, content: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + path.len() + content.len());
    buf.extend_from_slice(&(path.len() as u32).to_le_bytes());
    buf.extend_from_slice(path.as_bytes());
    buf.extend_from_slice(content);
    buf
}

fn decode_entry(mut bytes: Vec<u8>) -> Option<(String, Vec<u8>)> {
    let len_bytes: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    let end = 4usize.checked_add(u32::from_le_bytes(len_bytes) as usize)?;
    let path = String::from_utf8(bytes.get(4..end)?.to_vec()).ok()?;
    let content = bytes.split_off(end);
    Some((path, content))
}

/// read and decode one entry file, `None` if it is missing or unreadable
fn read_entry(file: &Path) -> Result<Option<(String, Vec<u8>)>> {
    let bytes = match fs::read(file) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_path(file),
    };

    let entry = decode_entry(bytes);
    if entry.is_none() {
        tracing::warn!(entry = %file.display(), "ignoring malformed index entry");
    }
    Ok(entry)
}

/// stage `content` for `path`, replacing any earlier entry
pub fn stage_content(repo: &Repo, path: &str, content: &[u8]) -> Result<()> {
    write_atomic(repo, &entry_path(repo, path), &encode_entry(path, content))?;
    tracing::debug!(path, len = content.len(), "staged");
    Ok(())
}

/// drop the entry for `path`; returns whether one existed
pub fn unstage(repo: &Repo, path: &str) -> Result<bool> {
    let entry = entry_path(repo, path);
    match fs::remove_file(&entry) {
        Ok(()) => {
            tracing::debug!(path, "unstaged");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_path(entry),
    }
}

/// is `path` staged for addition
pub fn is_staged(repo: &Repo, path: &str) -> bool {
    entry_path(repo, path).is_file()
}

/// staged content for `path`, if any
pub fn read_staged(repo: &Repo, path: &str) -> Result<Option<Vec<u8>>> {
    Ok(read_entry(&entry_path(repo, path))?
        .filter(|(staged, _)| staged == path)
        .map(|(_, content)| content))
}

/// all staged paths with their content
pub fn staged_entries(repo: &Repo) -> Result<BTreeMap<String, Vec<u8>>> {
    let dir = repo.index_path();
    let mut entries = BTreeMap::new();

    if !dir.exists() {
        return Ok(entries);
    }

    for item in fs::read_dir(&dir).with_path(&dir)? {
        let file = item.with_path(&dir)?.path();
        if let Some((path, content)) = read_entry(&file)? {
            entries.insert(path, content);
        }
    }

    Ok(entries)
}

/// all staged paths, sorted
pub fn staged_paths(repo: &Repo) -> Result<BTreeSet<String>> {
    Ok(staged_entries(repo)?.into_keys().collect())
}

/// remove every staged entry
pub fn clear_index(repo: &Repo) -> Result<()> {
    let dir = repo.index_path();
    if !dir.exists() {
        return Ok(());
    }

    for item in fs::read_dir(&dir).with_path(&dir)? {
        let file = item.with_path(&dir)?.path();
        fs::remove_file(&file).with_path(&file)?;
    }
    tracing::debug!("cleared index");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_stage_and_read() {
        let (_dir, repo) = test_repo();

        stage_content(&repo, "dir/a.txt", b"hello").unwrap();

        assert!(is_staged(&repo, "dir/a.txt"));
        assert_eq!(read_staged(&repo, "dir/a.txt").unwrap(), Some(b"hello".to_vec()));
        assert_eq!(read_staged(&repo, "b.txt").unwrap(), None);
    }

    #[test]
    fn test_restage_overwrites() {
        let (_dir, repo) = test_repo();

        stage_content(&repo, "a.txt", b"one").unwrap();
        stage_content(&repo, "a.txt", b"two").unwrap();

        let entries = staged_entries(&repo).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries["a.txt"], b"two");
    }

    #[test]
    fn test_unstage() {
        let (_dir, repo) = test_repo();

        stage_content(&repo, "a.txt", b"x").unwrap();
        assert!(unstage(&repo, "a.txt").unwrap());
        assert!(!unstage(&repo, "a.txt").unwrap());
        assert!(!is_staged(&repo, "a.txt"));
    }

    #[test]
    fn test_staged_paths_sorted() {
        let (_dir, repo) = test_repo();

        stage_content(&repo, "z.txt", b"1").unwrap();
        stage_content(&repo, "a/b.txt", b"2").unwrap();
        stage_content(&repo, "m.txt", b"3").unwrap();

        let paths: Vec<_> = staged_paths(&repo).unwrap().into_iter().collect();
        assert_eq!(paths, vec!["a/b.txt", "m.txt", "z.txt"]);
    }

    #[test]
    fn test_clear_index() {
        let (_dir, repo) = test_repo();

        stage_content(&repo, "a.txt", b"1").unwrap();
        stage_content(&repo, "b.txt", b"2").unwrap();
        clear_index(&repo).unwrap();

        assert!(staged_paths(&repo).unwrap().is_empty());
    }

    #[test]
    fn test_long_nested_path() {
        let (_dir, repo) = test_repo();
        let path = format!("{}/{}/{}.txt", "a".repeat(90), "b".repeat(60), "c".repeat(44));
        assert!(path.len() >= 200);

        stage_content(&repo, &path, b"deep").unwrap();

        assert!(is_staged(&repo, &path));
        assert_eq!(read_staged(&repo, &path).unwrap(), Some(b"deep".to_vec()));
        assert_eq!(staged_paths(&repo).unwrap().into_iter().collect::<Vec<_>>(), vec![path]);
    }

    #[test]
    fn test_malformed_entry_is_ignored() {
        let (_dir, repo) = test_repo();
        stage_content(&repo, "a.txt", b"a").unwrap();
        fs::write(repo.index_path().join("junk"), [0xff, 0xff]).unwrap();

        let paths: Vec<_> = staged_paths(&repo).unwrap().into_iter().collect();
        assert_eq!(paths, vec!["a.txt"]);
    }

    #[test]
    fn test_empty_content_round_trips() {
        let (_dir, repo) = test_repo();
        stage_content(&repo, "empty.txt", b"").unwrap();

        assert_eq!(read_staged(&repo, "empty.txt").unwrap(), Some(Vec::new()));
    }
}
