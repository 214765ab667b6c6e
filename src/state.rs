//! the mutable control-plane record of a repository
//!
//! one CBOR record at `.twig/state` holding HEAD, the current branch, every
//! branch pointer, and the paths staged for removal. it is read once per
//! command and written back atomically once the command succeeds.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fs::write_atomic;
use crate::hash::Hash;
use crate::repo::Repo;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoState {
    /// commit the current branch points to
    pub head: Hash,
    /// name of the checked-out branch
    pub current_branch: String,
    /// branch name -> tip commit
    pub branches: BTreeMap<String, Hash>,
    /// paths staged for removal in the next commit
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub removed: BTreeSet<String>,
    /// empty the staging area once this record has been saved
    #[serde(skip)]
    index_clear_pending: bool,
}

impl RepoState {
    /// fresh state with a single branch pointing at `root`
    pub fn new(branch: impl Into<String>, root: Hash) -> Self {
        let branch = branch.into();
        let mut branches = BTreeMap::new();
        branches.insert(branch.clone(), root);
        Self {
            head: root,
            current_branch: branch,
            branches,
            removed: BTreeSet::new(),
            index_clear_pending: false,
        }
    }

    /// read the state record
    pub fn load(repo: &Repo) -> Result<Self> {
        let path = repo.state_path();
        let bytes = fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NoRepo(repo.root().to_path_buf())
            } else {
                Error::Io {
                    path: path.clone(),
                    source: e,
                }
            }
        })?;
        let state: RepoState = ciborium::from_reader(&bytes[..])?;
        Ok(state)
    }

    /// write the state record atomically
    pub fn save(&self, repo: &Repo) -> Result<()> {
        let mut bytes = Vec::new();
        ciborium::into_writer(self, &mut bytes)?;
        write_atomic(repo, &repo.state_path(), &bytes)
    }

    /// is `path` staged for removal
    pub fn is_removed(&self, path: &str) -> bool {
        self.removed.contains(path)
    }

    /// drop the removal set and schedule the staged entries for deletion
    ///
    /// the entries stay on disk until `Repo::transaction` has saved this
    /// record, so a failed save never loses staged content.
    pub fn discard_staging(&mut self) {
        self.removed.clear();
        self.index_clear_pending = true;
    }

    /// whether `discard_staging` was called since this record was loaded
    pub fn index_clear_pending(&self) -> bool {
        self.index_clear_pending
    }
}
