use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::object::write_commit;
use crate::refs::validate_branch_name;
use crate::repo::Repo;
use crate::state::RepoState;
use crate::types::Commit;

/// initialize a repository in `root` with the default configuration
pub fn init(root: &Path) -> Result<Repo> {
    init_with_config(root, Config::default())
}

/// initialize a repository in `root`
///
/// writes the root commit and points the default branch at it.
pub fn init_with_config(root: &Path, config: Config) -> Result<Repo> {
    validate_branch_name(&config.default_branch)?;

    let repo = Repo::init_with_config(root, config)?;
    let hash = write_commit(&repo, &Commit::initial())?;
    RepoState::new(repo.config().default_branch.clone(), hash).save(&repo)?;

    tracing::info!(root = %root.display(), %hash, "initialized repository");
    Ok(repo)
}
