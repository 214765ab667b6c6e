//! twig - a small local version control core
//!
//! snapshots of a work tree are stored as content-addressed blobs and commits,
//! chained into a DAG with named branch pointers and merged three ways.
//!
//! # Core concepts
//!
//! - **Blob**: raw file content, named by its SHA-256
//! - **Commit**: the full tracked file set (path -> blob hash) plus parents,
//!   message and timestamp (CBOR + zstd)
//! - **Branch**: a named pointer to a commit; HEAD follows the current branch
//! - **Index**: copies of staged content waiting for the next commit
//!
//! # Hash format
//!
//! blob hash = SHA256(content)
//!
//! commit hash = SHA256(count | (path_len | path | blob)... | parents | msg_len | msg | timestamp)
//!
//! with paths in sorted order, so equal commits hash equally however their map
//! was built.
//!
//! # Example usage
//!
//! ```no_run
//! use twig::{ops, Repo};
//! use std::path::Path;
//!
//! let repo = ops::init(Path::new("/path/to/work")).unwrap();
//!
//! repo.transaction(|state| {
//!     ops::add(&repo, state, "README")?;
//!     ops::commit(&repo, state, "add readme")
//! })
//! .unwrap();
//! ```

mod config;
mod error;
mod hash;
mod refs;
mod repo;
mod state;

pub mod fs;
pub mod index;
pub mod merge;
pub mod object;
pub mod ops;
pub mod types;
pub mod worktree;

pub use config::Config;
pub use error::{Error, Result};
pub use hash::{compute_blob_hash, compute_commit_hash, Hash};
pub use object::{read_blob, read_commit, resolve_commit, write_blob, write_commit};
pub use refs::{
    advance_head, branch_tip, create_branch, delete_branch, list_branches, switch_branch,
    validate_branch_name,
};
pub use repo::{Repo, META_DIR};
pub use state::RepoState;
pub use types::{Commit, FileChange, Status};
