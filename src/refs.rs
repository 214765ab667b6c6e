use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::state::RepoState;

/// create a branch pointing at the current HEAD
pub fn create_branch(state: &mut RepoState, name: &str) -> Result<()> {
    validate_branch_name(name)?;

    if state.branches.contains_key(name) {
        return Err(Error::BranchExists(name.to_string()));
    }

    state.branches.insert(name.to_string(), state.head);
    tracing::info!(branch = name, head = %state.head, "created branch");
    Ok(())
}

/// delete a branch pointer (never the commits it points to)
pub fn delete_branch(state: &mut RepoState, name: &str) -> Result<()> {
    if !state.branches.contains_key(name) {
        return Err(Error::BranchNotFound(name.to_string()));
    }
    if state.current_branch == name {
        return Err(Error::CannotRemoveCurrentBranch(name.to_string()));
    }

    state.branches.remove(name);
    tracing::info!(branch = name, "removed branch");
    Ok(())
}

/// tip commit of a branch
pub fn branch_tip(state: &RepoState, name: &str) -> Result<Hash> {
    state
        .branches
        .get(name)
        .copied()
        .ok_or_else(|| Error::BranchNotFound(name.to_string()))
}

/// move HEAD and the current branch pointer together
pub fn advance_head(state: &mut RepoState, hash: Hash) {
    state.head = hash;
    state.branches.insert(state.current_branch.clone(), hash);
    tracing::info!(branch = %state.current_branch, head = %hash, "moved branch");
}

/// make `name` the current branch and HEAD its tip
pub fn switch_branch(state: &mut RepoState, name: &str) -> Result<()> {
    let tip = branch_tip(state, name)?;
    state.current_branch = name.to_string();
    state.head = tip;
    tracing::info!(branch = name, head = %tip, "switched branch");
    Ok(())
}

/// list branch names in sorted order
pub fn list_branches(state: &RepoState) -> Vec<String> {
    state.branches.keys().cloned().collect()
}

/// validate branch name
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidBranchName("empty branch name".to_string()));
    }

    if name.starts_with('-') {
        return Err(Error::InvalidBranchName(format!(
            "branch name cannot start with '-': {}",
            name
        )));
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(Error::InvalidBranchName(format!(
            "branch name cannot start or end with '/': {}",
            name
        )));
    }

    if name.contains("//") {
        return Err(Error::InvalidBranchName(format!(
            "branch name cannot contain '//': {}",
            name
        )));
    }

    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::InvalidBranchName(format!(
            "branch name cannot contain whitespace or control characters: {:?}",
            name
        )));
    }

    for component in name.split('/') {
        if component == "." || component == ".." {
            return Err(Error::InvalidBranchName(format!(
                "branch name cannot contain '.' or '..': {}",
                name
            )));
        }
    }

    Ok(())
}
