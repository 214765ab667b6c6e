use std::path::PathBuf;

use crate::Hash;

/// error type for twig operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a twig repository: {0}")]
    NoRepo(PathBuf),

    #[error("a twig repository already exists at {0}")]
    RepoExists(PathBuf),

    #[error("file does not exist: {0}")]
    FileNotFound(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("please enter a commit message")]
    EmptyMessage,

    #[error("no changes added to the commit")]
    NothingToCommit,

    #[error("no reason to remove the file: {0}")]
    NothingToRemove(String),

    #[error("untracked file in the way: {0}; delete it, or add and commit it first")]
    UntrackedFileInTheWay(String),

    #[error("a branch with that name already exists: {0}")]
    BranchExists(String),

    #[error("a branch with that name does not exist: {0}")]
    BranchNotFound(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("cannot remove the current branch: {0}")]
    CannotRemoveCurrentBranch(String),

    #[error("no need to checkout the current branch: {0}")]
    AlreadyOnBranch(String),

    #[error("cannot merge a branch with itself")]
    MergeWithSelf,

    #[error("you have uncommitted changes")]
    UncommittedChanges,

    #[error("no commit with that id exists: {0}")]
    CommitNotFound(String),

    #[error("file does not exist in that commit: {0}")]
    FileNotInCommit(String),

    #[error("found no commit with that message")]
    NoCommitWithMessage,

    #[error("no common ancestor between {0} and {1}")]
    NoCommonAncestor(Hash, Hash),

    #[error("object not found: {0}")]
    ObjectNotFound(Hash),

    #[error("corrupt object: hash mismatch for {0}")]
    CorruptObject(Hash),

    #[error("invalid hash hex: {0}")]
    InvalidHashHex(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cbor serialization error: {0}")]
    CborEncode(#[from] ciborium::ser::Error<std::io::Error>),

    #[error("cbor deserialization error: {0}")]
    CborDecode(#[from] ciborium::de::Error<std::io::Error>),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
