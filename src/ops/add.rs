use crate::error::{Error, Result};
use crate::fs::{normalize_path, read_work_file};
use crate::hash::compute_blob_hash;
use crate::index::{stage_content, unstage};
use crate::object::read_commit;
use crate::repo::Repo;
use crate::state::RepoState;

/// what `add` did with a path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// the work tree content was copied into the staging area
    Staged,
    /// the content matches HEAD, so nothing is staged for it
    Unchanged,
}

/// stage the work tree version of `path`
///
/// a path whose content matches HEAD is dropped from the staging area
/// instead. either way it is no longer staged for removal.
pub fn add(repo: &Repo, state: &mut RepoState, path: &str) -> Result<AddOutcome> {
    let path = normalize_path(path)?;

    if !repo.root().join(&path).is_file() {
        return Err(Error::FileNotFound(path));
    }
    let content = read_work_file(repo.root(), &path)?.ok_or_else(|| Error::FileNotFound(path.clone()))?;

    let head = read_commit(repo, &state.head)?;
    state.removed.remove(&path);

    if head.blob(&path) == Some(&compute_blob_hash(&content)) {
        unstage(repo, &path)?;
        return Ok(AddOutcome::Unchanged);
    }

    stage_content(repo, &path, &content)?;
    Ok(AddOutcome::Staged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{is_staged, read_staged};
    use crate::ops::{commit_with_timestamp, init, rm};
    use std::fs;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_add_new_file() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let outcome = repo.transaction(|s| add(&repo, s, "a.txt")).unwrap();

        assert_eq!(outcome, AddOutcome::Staged);
        assert_eq!(read_staged(&repo, "a.txt").unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn test_add_nested_path() {
        let (dir, repo) = test_repo();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/lib.rs"), "fn main() {}").unwrap();

        repo.transaction(|s| add(&repo, s, "./src/lib.rs")).unwrap();
        assert!(is_staged(&repo, "src/lib.rs"));
    }

    #[test]
    fn test_add_long_path() {
        let (dir, repo) = test_repo();
        let parent = format!("{}/{}", "a".repeat(100), "b".repeat(60));
        let path = format!("{}/{}.txt", parent, "c".repeat(40));
        fs::create_dir_all(dir.path().join(&parent)).unwrap();
        fs::write(dir.path().join(&path), "long").unwrap();

        let outcome = repo.transaction(|s| add(&repo, s, &path)).unwrap();

        assert_eq!(outcome, AddOutcome::Staged);
        assert_eq!(read_staged(&repo, &path).unwrap(), Some(b"long".to_vec()));
    }

    #[test]
    fn test_add_missing_file() {
        let (_dir, repo) = test_repo();

        let result = repo.transaction(|s| add(&repo, s, "missing.txt"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_add_directory_is_not_a_file() {
        let (dir, repo) = test_repo();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let result = repo.transaction(|s| add(&repo, s, "sub"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_restage_overwrites_previous_content() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("a.txt"), "v1").unwrap();
        repo.transaction(|s| add(&repo, s, "a.txt")).unwrap();

        fs::write(dir.path().join("a.txt"), "v2").unwrap();
        repo.transaction(|s| add(&repo, s, "a.txt")).unwrap();

        assert_eq!(read_staged(&repo, "a.txt").unwrap(), Some(b"v2".to_vec()));
    }

    #[test]
    fn test_staging_converges_when_content_matches_head() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("a.txt"), "committed").unwrap();
        repo.transaction(|s| add(&repo, s, "a.txt")).unwrap();
        repo.transaction(|s| commit_with_timestamp(&repo, s, "c1", 1)).unwrap();

        // edit and stage
        fs::write(dir.path().join("a.txt"), "edited").unwrap();
        repo.transaction(|s| add(&repo, s, "a.txt")).unwrap();
        assert!(is_staged(&repo, "a.txt"));

        // revert and stage again: entry disappears
        fs::write(dir.path().join("a.txt"), "committed").unwrap();
        let outcome = repo.transaction(|s| add(&repo, s, "a.txt")).unwrap();

        assert_eq!(outcome, AddOutcome::Unchanged);
        assert!(!is_staged(&repo, "a.txt"));
    }

    #[test]
    fn test_add_clears_removal_mark() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        repo.transaction(|s| add(&repo, s, "a.txt")).unwrap();
        repo.transaction(|s| commit_with_timestamp(&repo, s, "c1", 1)).unwrap();

        repo.transaction(|s| rm(&repo, s, "a.txt")).unwrap();
        assert!(repo.state().unwrap().is_removed("a.txt"));

        fs::write(dir.path().join("a.txt"), "x").unwrap();
        repo.transaction(|s| add(&repo, s, "a.txt")).unwrap();

        let state = repo.state().unwrap();
        assert!(!state.is_removed("a.txt"));
        assert!(!is_staged(&repo, "a.txt"));
    }
}
