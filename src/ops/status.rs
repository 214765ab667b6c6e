use std::collections::BTreeMap;

use crate::error::Result;
use crate::fs::{list_work_files, read_work_file};
use crate::hash::compute_blob_hash;
use crate::index::staged_entries;
use crate::object::read_commit;
use crate::refs::list_branches;
use crate::repo::Repo;
use crate::state::RepoState;
use crate::types::{FileChange, Status};

/// compare HEAD, the staging area and the work tree
pub fn status(repo: &Repo, state: &RepoState) -> Result<Status> {
    let head = read_commit(repo, &state.head)?;
    let staged = staged_entries(repo)?;
    let work_files = list_work_files(repo.root())?;

    let mut unstaged = BTreeMap::new();

    for (path, content) in &staged {
        match read_work_file(repo.root(), path)? {
            None => {
                unstaged.insert(path.clone(), FileChange::Deleted);
            }
            Some(work) if work != *content => {
                unstaged.insert(path.clone(), FileChange::Modified);
            }
            Some(_) => {}
        }
    }

    for (path, blob) in &head.blobs {
        if staged.contains_key(path) || state.is_removed(path) {
            continue;
        }
        if !work_files.contains(path) {
            unstaged.insert(path.clone(), FileChange::Deleted);
            continue;
        }
        if let Some(work) = read_work_file(repo.root(), path)? {
            if compute_blob_hash(&work) != *blob {
                unstaged.insert(path.clone(), FileChange::Modified);
            }
        }
    }

    // a path removed but recreated on disk is untracked again
    let untracked = work_files
        .into_iter()
        .filter(|p| !staged.contains_key(p) && (!head.tracks(p) || state.is_removed(p)))
        .collect();

    Ok(Status {
        current_branch: state.current_branch.clone(),
        branches: list_branches(state),
        staged: staged.into_keys().collect(),
        removed: state.removed.iter().cloned().collect(),
        unstaged,
        untracked,
    })
}
