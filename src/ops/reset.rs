use crate::error::Result;
use crate::hash::Hash;
use crate::object::{read_commit, resolve_commit};
use crate::refs::advance_head;
use crate::repo::Repo;
use crate::state::RepoState;
use crate::worktree::{sync_to, SyncOptions};

/// move the current branch to the commit named by `id` and check it out
pub fn reset(repo: &Repo, state: &mut RepoState, id: &str) -> Result<Hash> {
    let hash = resolve_commit(repo, id)?;
    let target = read_commit(repo, &hash)?;

    sync_to(repo, state, &target, SyncOptions::default())?;
    advance_head(state, hash);

    Ok(hash)
}
