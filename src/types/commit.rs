use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hash::{compute_commit_hash, Hash};

/// current unix time in seconds, the stamp of every new commit
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// message of the root commit written by init
pub const INITIAL_MESSAGE: &str = "initial commit";

/// a snapshot of the whole tracked file set plus lineage
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// first parent (none only for the root commit)
    pub parent: Option<Hash>,
    /// branch merged in (merge commits only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_parent: Option<Hash>,
    /// tracked path -> blob hash (BTreeMap for deterministic serialization)
    pub blobs: BTreeMap<String, Hash>,
    /// commit message
    pub message: String,
    /// unix timestamp (seconds since epoch)
    pub timestamp: i64,
}

impl Commit {
    /// create a new commit stamped with the current time
    pub fn new(
        parent: Option<Hash>,
        second_parent: Option<Hash>,
        blobs: BTreeMap<String, Hash>,
        message: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(parent, second_parent, blobs, message, now())
    }

    /// create a new commit with explicit timestamp
    pub fn with_timestamp(
        parent: Option<Hash>,
        second_parent: Option<Hash>,
        blobs: BTreeMap<String, Hash>,
        message: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            parent,
            second_parent,
            blobs,
            message: message.into(),
            timestamp,
        }
    }

    /// the root commit every repository starts from
    pub fn initial() -> Self {
        Self::with_timestamp(None, None, BTreeMap::new(), INITIAL_MESSAGE, 0)
    }

    /// content hash over the defining fields
    pub fn hash(&self) -> Hash {
        compute_commit_hash(
            &self.blobs,
            self.parent.as_ref(),
            self.second_parent.as_ref(),
            &self.message,
            self.timestamp,
        )
    }

    /// parents in order, first parent first
    pub fn parents(&self) -> impl Iterator<Item = Hash> + '_ {
        self.parent.iter().chain(self.second_parent.iter()).copied()
    }

    /// is this the root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// is this a merge commit (two parents)
    pub fn is_merge(&self) -> bool {
        self.second_parent.is_some()
    }

    /// is `path` tracked by this commit
    pub fn tracks(&self, path: &str) -> bool {
        self.blobs.contains_key(path)
    }

    /// blob recorded for `path`
    pub fn blob(&self, path: &str) -> Option<&Hash> {
        self.blobs.get(path)
    }
}
