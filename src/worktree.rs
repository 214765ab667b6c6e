//! bring the work tree in line with a commit

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::fs::{list_work_files, remove_work_file, write_work_file};
use crate::hash::Hash;
use crate::object::{read_blob, read_commit};
use crate::repo::Repo;
use crate::state::RepoState;
use crate::types::Commit;

/// options for `sync_to`
#[derive(Clone, Debug, Default)]
pub struct SyncOptions {
    /// keep staged entries and the removal set
    pub preserve_index: bool,
}

/// fail if switching from `current` to `target` would clobber an untracked file
///
/// checked for every path `target` tracks, before anything is written:
///
/// - the path exists in the work tree (file or symlink) but `current` does
///   not track it
/// - one of its parent directories exists as an untracked file or symlink
/// - it exists as a directory holding untracked files
///
/// a path `current` tracks that must be deleted but is now a directory is in
/// the way too.
pub fn check_untracked(repo: &Repo, current: &Commit, target: &Commit) -> Result<()> {
    let work = list_work_files(repo.root())?;
    let untracked = |p: &str| work.contains(p) && !current.tracks(p);

    for path in target.blobs.keys() {
        if untracked(path) {
            return Err(Error::UntrackedFileInTheWay(path.clone()));
        }

        for (i, _) in path.match_indices('/') {
            let ancestor = &path[..i];
            if untracked(ancestor) {
                return Err(Error::UntrackedFileInTheWay(ancestor.to_string()));
            }
        }

        if is_dir(repo, path) {
            let prefix = format!("{}/", path);
            let blocking = work
                .range(prefix.clone()..)
                .take_while(|p| p.starts_with(&prefix))
                .find(|p| !current.tracks(p));
            if let Some(file) = blocking {
                return Err(Error::UntrackedFileInTheWay(file.clone()));
            }
        }
    }

    for path in current.blobs.keys().filter(|p| !target.tracks(p)) {
        if is_dir(repo, path) {
            return Err(Error::UntrackedFileInTheWay(path.clone()));
        }
    }

    Ok(())
}

fn is_dir(repo: &Repo, path: &str) -> bool {
    std::fs::symlink_metadata(repo.root().join(path)).is_ok_and(|m| m.is_dir())
}

/// write every blob of `blobs` into the work tree
pub fn materialize(repo: &Repo, blobs: &BTreeMap<String, Hash>) -> Result<()> {
    for (path, hash) in blobs {
        let content = read_blob(repo, hash)?;
        write_work_file(repo.root(), path, &content)?;
    }
    Ok(())
}

/// replace the tracked file set `from` with `to` in the work tree
///
/// paths tracked by `from` but absent from `to` are deleted; every path in
/// `to` is written.
pub fn apply(repo: &Repo, from: &BTreeMap<String, Hash>, to: &BTreeMap<String, Hash>) -> Result<()> {
    for path in from.keys().filter(|p| !to.contains_key(*p)) {
        remove_work_file(repo.root(), path)?;
    }
    materialize(repo, to)
}

/// restore one path from `commit` without touching the index
pub fn restore_file(repo: &Repo, commit: &Commit, path: &str) -> Result<()> {
    let hash = commit
        .blob(path)
        .ok_or_else(|| Error::FileNotInCommit(path.to_string()))?;
    let content = read_blob(repo, hash)?;
    write_work_file(repo.root(), path, &content)
}

/// make the work tree match `target`, starting from HEAD
///
/// nothing is touched if an untracked file is in the way. HEAD itself is not
/// moved; callers update branch pointers once this succeeds.
pub fn sync_to(repo: &Repo, state: &mut RepoState, target: &Commit, opts: SyncOptions) -> Result<()> {
    let current = read_commit(repo, &state.head)?;
    check_untracked(repo, &current, target)?;

    apply(repo, &current.blobs, &target.blobs)?;

    if !opts.preserve_index {
        state.discard_staging();
    }

    tracing::debug!(from = %state.head, to = %target.hash(), "synchronized work tree");
    Ok(())
}
