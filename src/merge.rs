//! three-way merge of commit file sets
//!
//! ## Split point
//!
//! The merge base is found with two breadth-first walks: every ancestor of
//! `head` (both parent links) is collected into a seen-set, then ancestors of
//! `other` are walked breadth-first and the first one already seen is the
//! split point. This always yields *a* common ancestor, but when the graph has
//! several merge bases (criss-cross merges) it is not guaranteed to be the
//! lowest one.
//!
//! ## Per-path decisions
//!
//! For every path in the split, head, or other file set, with `s`, `h`, `o`
//! the blob hashes (or absence) on each side:
//!
//! - `h == o`: both sides agree (including both deleted), take it
//! - `h == s`: only `other` changed (modified, added or deleted), take `o`
//! - `o == s`: only `head` changed, take `h`
//! - otherwise both changed differently: conflict
//!
//! A conflict records a synthesized blob holding both versions between
//! `<<<<<<< HEAD`, `=======` and `>>>>>>>` markers.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::{read_blob, read_commit, write_blob};
use crate::repo::Repo;
use crate::types::Commit;

/// outcome for a single path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// take this version (`None` = path is deleted)
    Take(Option<Hash>),
    /// both sides diverged from the split point
    Conflict,
}

/// decide one path from its split, head and other versions
pub fn resolve(split: Option<&Hash>, head: Option<&Hash>, other: Option<&Hash>) -> Resolution {
    if head == other {
        Resolution::Take(head.copied())
    } else if head == split {
        Resolution::Take(other.copied())
    } else if other == split {
        Resolution::Take(head.copied())
    } else {
        Resolution::Conflict
    }
}

/// find a common ancestor of `head` and `other`
pub fn split_point(repo: &Repo, head: &Hash, other: &Hash) -> Result<Hash> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([*head]);
    while let Some(hash) = queue.pop_front() {
        if !seen.insert(hash) {
            continue;
        }
        queue.extend(read_commit(repo, &hash)?.parents());
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([*other]);
    while let Some(hash) = queue.pop_front() {
        if seen.contains(&hash) {
            tracing::debug!(%head, %other, split = %hash, "found split point");
            return Ok(hash);
        }
        if !visited.insert(hash) {
            continue;
        }
        queue.extend(read_commit(repo, &hash)?.parents());
    }

    Err(Error::NoCommonAncestor(*head, *other))
}

/// build conflict file content from both sides
///
/// a missing side contributes nothing; a present side is terminated by a
/// newline so the markers always start a line.
pub fn conflict_content(head: Option<&[u8]>, other: Option<&[u8]>) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"<<<<<<< HEAD\n");
    push_side(&mut out, head);
    out.extend_from_slice(b"=======\n");
    push_side(&mut out, other);
    out.extend_from_slice(b">>>>>>>\n");
    out
}

fn push_side(out: &mut Vec<u8>, side: Option<&[u8]>) {
    if let Some(content) = side {
        out.extend_from_slice(content);
        if !content.is_empty() && !content.ends_with(b"\n") {
            out.push(b'\n');
        }
    }
}

/// merged file set
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergedTree {
    /// path -> blob hash of the merge result
    pub blobs: BTreeMap<String, Hash>,
    /// paths that received conflict markers, sorted
    pub conflicts: Vec<String>,
}

impl MergedTree {
    pub fn is_conflicted(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// merge the file sets of `head` and `other` against `split`
///
/// conflict blobs are written to the object store as a side effect.
pub fn merge_trees(repo: &Repo, split: &Commit, head: &Commit, other: &Commit) -> Result<MergedTree> {
    let paths: BTreeSet<&String> = split
        .blobs
        .keys()
        .chain(head.blobs.keys())
        .chain(other.blobs.keys())
        .collect();

    let mut merged = MergedTree::default();
    for path in paths {
        let ours = head.blob(path);
        let theirs = other.blob(path);

        match resolve(split.blob(path), ours, theirs) {
            Resolution::Take(Some(hash)) => {
                merged.blobs.insert(path.clone(), hash);
            }
            Resolution::Take(None) => {}
            Resolution::Conflict => {
                let ours = ours.map(|h| read_blob(repo, h)).transpose()?;
                let theirs = theirs.map(|h| read_blob(repo, h)).transpose()?;
                let content = conflict_content(ours.as_deref(), theirs.as_deref());
                let hash = write_blob(repo, &content)?;

                tracing::warn!(path = %path, "merge conflict");
                merged.blobs.insert(path.clone(), hash);
                merged.conflicts.push(path.clone());
            }
        }
    }

    Ok(merged)
}
