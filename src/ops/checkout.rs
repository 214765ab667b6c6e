use crate::error::{Error, Result};
use crate::fs::normalize_path;
use crate::object::{read_commit, resolve_commit};
use crate::refs::{branch_tip, switch_branch};
use crate::repo::Repo;
use crate::state::RepoState;
use crate::worktree::{restore_file, sync_to, SyncOptions};

/// switch the work tree and HEAD to another branch
///
/// the staging area is cleared. fails without touching anything if an
/// untracked file would be overwritten.
pub fn checkout_branch(repo: &Repo, state: &mut RepoState, name: &str) -> Result<()> {
    let tip = branch_tip(state, name)?;
    if state.current_branch == name {
        return Err(Error::AlreadyOnBranch(name.to_string()));
    }

    let target = read_commit(repo, &tip)?;
    sync_to(repo, state, &target, SyncOptions::default())?;
    switch_branch(state, name)
}

/// restore `path` to its HEAD version; the staging area is left alone
pub fn checkout_file(repo: &Repo, state: &RepoState, path: &str) -> Result<()> {
    let path = normalize_path(path)?;
    let head = read_commit(repo, &state.head)?;
    restore_file(repo, &head, &path)
}

/// restore `path` as recorded in the commit named by `id` (a hash or prefix)
pub fn checkout_file_at(repo: &Repo, id: &str, path: &str) -> Result<()> {
    let path = normalize_path(path)?;
    let hash = resolve_commit(repo, id)?;
    let commit = read_commit(repo, &hash)?;
    restore_file(repo, &commit, &path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Hash;
    use crate::index::{is_staged, staged_paths};
    use crate::ops::{add, commit_with_timestamp, init};
    use crate::refs::create_branch;
    use std::fs;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = init(dir.path()).unwrap();
        (dir, repo)
    }

    fn commit_file(repo: &Repo, path: &str, content: &str, message: &str, ts: i64) -> Hash {
        fs::write(repo.root().join(path), content).unwrap();
        repo.transaction(|s| add(repo, s, path)).unwrap();
        repo.transaction(|s| commit_with_timestamp(repo, s, message, ts)).unwrap().hash
    }

    #[test]
    fn test_checkout_branch_round_trip() {
        let (dir, repo) = test_repo();
        commit_file(&repo, "a.txt", "master a", "c1", 1);
        repo.transaction(|s| create_branch(s, "feature")).unwrap();
        repo.transaction(|s| checkout_branch(&repo, s, "feature")).unwrap();
        commit_file(&repo, "a.txt", "feature a", "c2", 2);
        let feature = commit_file(&repo, "only-feature.txt", "f", "c3", 3);

        repo.transaction(|s| checkout_branch(&repo, s, "master")).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "master a");
        assert!(!dir.path().join("only-feature.txt").exists());

        let state = repo.state().unwrap();
        assert_eq!(state.current_branch, "master");
        assert_eq!(state.head, state.branches["master"]);

        repo.transaction(|s| checkout_branch(&repo, s, "feature")).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("only-feature.txt")).unwrap(), "f");
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "feature a");
        assert_eq!(repo.state().unwrap().head, feature);
    }

    #[test]
    fn test_checkout_branch_clears_index() {
        let (dir, repo) = test_repo();
        commit_file(&repo, "a.txt", "a", "c1", 1);
        repo.transaction(|s| create_branch(s, "other")).unwrap();

        fs::write(dir.path().join("b.txt"), "b").unwrap();
        repo.transaction(|s| add(&repo, s, "b.txt")).unwrap();
        repo.transaction(|s| checkout_branch(&repo, s, "other")).unwrap();

        assert!(staged_paths(&repo).unwrap().is_empty());
    }

    #[test]
    fn test_checkout_current_branch() {
        let (_dir, repo) = test_repo();
        let result = repo.transaction(|s| checkout_branch(&repo, s, "master"));
        assert!(matches!(result, Err(Error::AlreadyOnBranch(_))));
    }

    #[test]
    fn test_checkout_missing_branch() {
        let (_dir, repo) = test_repo();
        let result = repo.transaction(|s| checkout_branch(&repo, s, "nope"));
        assert!(matches!(result, Err(Error::BranchNotFound(_))));
    }

    #[test]
    fn test_checkout_branch_untracked_in_the_way() {
        let (dir, repo) = test_repo();
        repo.transaction(|s| create_branch(s, "feature")).unwrap();
        repo.transaction(|s| checkout_branch(&repo, s, "feature")).unwrap();
        commit_file(&repo, "a.txt", "tracked on feature", "c1", 1);
        repo.transaction(|s| checkout_branch(&repo, s, "master")).unwrap();

        fs::write(dir.path().join("a.txt"), "precious").unwrap();
        let before = repo.state().unwrap();

        let result = repo.transaction(|s| checkout_branch(&repo, s, "feature"));
        assert!(matches!(result, Err(Error::UntrackedFileInTheWay(_))));
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "precious");
        assert_eq!(repo.state().unwrap(), before);
    }

    #[test]
    fn test_checkout_file_from_head() {
        let (dir, repo) = test_repo();
        commit_file(&repo, "a.txt", "committed", "c1", 1);
        fs::write(dir.path().join("a.txt"), "edited").unwrap();
        repo.transaction(|s| add(&repo, s, "a.txt")).unwrap();

        checkout_file(&repo, &repo.state().unwrap(), "a.txt").unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "committed");
        // staging area untouched
        assert!(is_staged(&repo, "a.txt"));
    }

    #[test]
    fn test_checkout_file_at_prefix() {
        let (dir, repo) = test_repo();
        let c1 = commit_file(&repo, "a.txt", "v1", "c1", 1);
        commit_file(&repo, "a.txt", "v2", "c2", 2);

        checkout_file_at(&repo, &c1.short(), "a.txt").unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "v1");
    }

    #[test]
    fn test_checkout_file_errors() {
        let (_dir, repo) = test_repo();
        let c1 = commit_file(&repo, "a.txt", "v1", "c1", 1);

        let result = checkout_file_at(&repo, &c1.to_hex(), "missing.txt");
        assert!(matches!(result, Err(Error::FileNotInCommit(_))));

        let result = checkout_file_at(&repo, "ffffffffff", "a.txt");
        assert!(matches!(result, Err(Error::CommitNotFound(_))));

        let result = checkout_file(&repo, &repo.state().unwrap(), "missing.txt");
        assert!(matches!(result, Err(Error::FileNotInCommit(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_checkout_branch_never_writes_through_symlink() {
        let (dir, repo) = test_repo();
        let outside = tempdir().unwrap();
        let precious = outside.path().join("precious");
        fs::write(&precious, "precious").unwrap();

        repo.transaction(|s| create_branch(s, "feature")).unwrap();
        repo.transaction(|s| checkout_branch(&repo, s, "feature")).unwrap();
        commit_file(&repo, "a.txt", "tracked on feature", "c1", 1);
        repo.transaction(|s| checkout_branch(&repo, s, "master")).unwrap();

        std::os::unix::fs::symlink(&precious, dir.path().join("a.txt")).unwrap();
        let before = repo.state().unwrap();

        let result = repo.transaction(|s| checkout_branch(&repo, s, "feature"));
        assert!(matches!(result, Err(Error::UntrackedFileInTheWay(_))));
        assert_eq!(fs::read_to_string(&precious).unwrap(), "precious");
        assert_eq!(repo.state().unwrap(), before);
    }
}
