use std::fmt;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::index::staged_paths;
use crate::merge::{merge_trees, split_point};
use crate::object::{read_commit, write_commit};
use crate::refs::{advance_head, branch_tip};
use crate::repo::Repo;
use crate::state::RepoState;
use crate::types::Commit;
use crate::worktree::{apply, check_untracked, sync_to, SyncOptions};

/// what `merge` did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// the branch is already part of HEAD's history
    AlreadyAncestor,
    /// the current branch now points at the merged branch's tip
    FastForward(Hash),
    /// a two-parent merge commit was created
    Merged { hash: Hash, conflicted: bool },
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOutcome::AlreadyAncestor => write!(f, "Given branch is an ancestor of the current branch."),
            MergeOutcome::FastForward(_) => write!(f, "Current branch fast-forwarded."),
            MergeOutcome::Merged { conflicted: true, .. } => write!(f, "Encountered a merge conflict."),
            MergeOutcome::Merged { hash, .. } => write!(f, "Merged as {}.", hash.short()),
        }
    }
}

/// message recorded on a merge commit
pub fn merge_message(branch: &str, current: &str) -> String {
    format!("Merged {} into {}.", branch, current)
}

/// merge `branch` into the current branch
///
/// refuses to run with anything staged, and checks the work tree against the
/// other branch's files before changing anything. conflicts are written into
/// the work tree and still produce a merge commit.
pub fn merge(repo: &Repo, state: &mut RepoState, branch: &str) -> Result<MergeOutcome> {
    if !staged_paths(repo)?.is_empty() || !state.removed.is_empty() {
        return Err(Error::UncommittedChanges);
    }

    let other_hash = branch_tip(state, branch)?;
    if branch == state.current_branch {
        return Err(Error::MergeWithSelf);
    }

    let head_hash = state.head;
    let head = read_commit(repo, &head_hash)?;
    let other = read_commit(repo, &other_hash)?;
    check_untracked(repo, &head, &other)?;

    let split_hash = split_point(repo, &head_hash, &other_hash)?;

    if split_hash == other_hash {
        return Ok(MergeOutcome::AlreadyAncestor);
    }

    if split_hash == head_hash {
        sync_to(repo, state, &other, SyncOptions::default())?;
        advance_head(state, other_hash);
        tracing::info!(branch, to = %other_hash, "fast-forwarded");
        return Ok(MergeOutcome::FastForward(other_hash));
    }

    let split = read_commit(repo, &split_hash)?;
    let merged = merge_trees(repo, &split, &head, &other)?;
    let conflicted = merged.is_conflicted();

    let commit = Commit::new(
        Some(head_hash),
        Some(other_hash),
        merged.blobs,
        merge_message(branch, &state.current_branch),
    );
    let hash = write_commit(repo, &commit)?;

    apply(repo, &head.blobs, &commit.blobs)?;
    advance_head(state, hash);

    tracing::info!(branch, %hash, split = %split_hash, conflicted, "merged");
    Ok(MergeOutcome::Merged { hash, conflicted })
}
