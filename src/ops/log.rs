use std::fmt;

use chrono::{DateTime, Local};

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::{list_commits, read_commit};
use crate::repo::Repo;
use crate::state::RepoState;
use crate::types::Commit;

/// commit with its hash for log output
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub hash: Hash,
    pub commit: Commit,
}

/// first-parent history from HEAD, newest first
pub fn log(repo: &Repo, state: &RepoState, max_count: Option<usize>) -> Result<Vec<LogEntry>> {
    let mut entries = Vec::new();
    let mut next = Some(state.head);

    while let Some(hash) = next {
        if max_count.is_some_and(|max| entries.len() >= max) {
            break;
        }

        let commit = read_commit(repo, &hash)?;
        next = commit.parent;
        entries.push(LogEntry { hash, commit });
    }

    Ok(entries)
}

/// every commit in the object store, newest first
pub fn global_log(repo: &Repo) -> Result<Vec<LogEntry>> {
    let mut entries = list_commits(repo)?
        .into_iter()
        .map(|hash| Ok(LogEntry { hash, commit: read_commit(repo, &hash)? }))
        .collect::<Result<Vec<_>>>()?;

    entries.sort_by(|a, b| b.commit.timestamp.cmp(&a.commit.timestamp).then(a.hash.cmp(&b.hash)));
    Ok(entries)
}

/// hashes of all commits whose message is exactly `message`
pub fn find(repo: &Repo, message: &str) -> Result<Vec<Hash>> {
    let mut found = Vec::new();
    for hash in list_commits(repo)? {
        if read_commit(repo, &hash)?.message == message {
            found.push(hash);
        }
    }

    if found.is_empty() {
        return Err(Error::NoCommitWithMessage);
    }
    Ok(found)
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===")?;
        writeln!(f, "commit {}", self.hash)?;

        if let (Some(p1), Some(p2)) = (self.commit.parent, self.commit.second_parent) {
            writeln!(f, "Merge: {} {}", p1.short(), p2.short())?;
        }

        writeln!(f, "Date: {}", format_timestamp(self.commit.timestamp))?;
        writeln!(f, "{}", self.commit.message)?;
        writeln!(f)
    }
}

/// render a unix timestamp in local time
fn format_timestamp(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc.with_timezone(&Local).format("%a %b %-d %H:%M:%S %Y %z").to_string(),
        None => timestamp.to_string(),
    }
}
