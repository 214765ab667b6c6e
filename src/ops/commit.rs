use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::index::staged_entries;
use crate::object::{read_commit, write_blob, write_commit};
use crate::refs::advance_head;
use crate::repo::Repo;
use crate::state::RepoState;
use crate::types::{now, Commit};

/// result of a successful commit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitOutcome {
    pub hash: Hash,
    /// paths written from the staging area
    pub added: usize,
    /// paths dropped from the parent's file set
    pub removed: usize,
}

/// build a child of `parent` from staged additions and removals
///
/// the blob map starts as the parent's, loses every removed path, then takes a
/// freshly stored blob for every addition. blobs are written to the object
/// store; the commit itself is not.
pub fn build_commit(
    repo: &Repo,
    parent_hash: Hash,
    parent: &Commit,
    additions: &BTreeMap<String, Vec<u8>>,
    removals: &BTreeSet<String>,
    message: &str,
    timestamp: i64,
) -> Result<Commit> {
    if additions.is_empty() && removals.is_empty() {
        return Err(Error::NothingToCommit);
    }

    let mut blobs = parent.blobs.clone();
    blobs.retain(|path, _| !removals.contains(path));

    for (path, content) in additions {
        let hash = write_blob(repo, content)?;
        blobs.insert(path.clone(), hash);
    }

    Ok(Commit::with_timestamp(Some(parent_hash), None, blobs, message, timestamp))
}

/// commit the staging area on top of HEAD
pub fn commit(repo: &Repo, state: &mut RepoState, message: &str) -> Result<CommitOutcome> {
    commit_with_timestamp(repo, state, message, now())
}

/// commit the staging area on top of HEAD with an explicit timestamp
pub fn commit_with_timestamp(
    repo: &Repo,
    state: &mut RepoState,
    message: &str,
    timestamp: i64,
) -> Result<CommitOutcome> {
    if message.trim().is_empty() {
        return Err(Error::EmptyMessage);
    }

    let additions = staged_entries(repo)?;
    let parent = read_commit(repo, &state.head)?;
    let commit = build_commit(repo, state.head, &parent, &additions, &state.removed, message, timestamp)?;

    let hash = write_commit(repo, &commit)?;
    let outcome = CommitOutcome {
        hash,
        added: additions.len(),
        removed: state.removed.len(),
    };

    state.discard_staging();
    advance_head(state, hash);

    Ok(outcome)
}
