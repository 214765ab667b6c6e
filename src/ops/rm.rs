use crate::error::{Error, Result};
use crate::fs::{normalize_path, remove_work_file};
use crate::index::unstage;
use crate::object::read_commit;
use crate::repo::Repo;
use crate::state::RepoState;

/// what `rm` did with a path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RmOutcome {
    /// the path was only staged for addition; that entry is gone
    Unstaged,
    /// the tracked path is staged for removal and deleted from the work tree
    Removed,
}

/// unstage `path`, or stage its removal if HEAD tracks it
pub fn rm(repo: &Repo, state: &mut RepoState, path: &str) -> Result<RmOutcome> {
    let path = normalize_path(path)?;

    if unstage(repo, &path)? {
        return Ok(RmOutcome::Unstaged);
    }

    let head = read_commit(repo, &state.head)?;
    if !head.tracks(&path) {
        return Err(Error::NothingToRemove(path));
    }

    remove_work_file(repo.root(), &path)?;
    tracing::debug!(path = %path, "staged for removal");
    state.removed.insert(path);

    Ok(RmOutcome::Removed)
}
