use std::collections::BTreeMap;
use std::fmt;

/// how a tracked work tree file differs from what would be committed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileChange {
    Modified,
    Deleted,
}

impl fmt::Display for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileChange::Modified => write!(f, "modified"),
            FileChange::Deleted => write!(f, "deleted"),
        }
    }
}

/// snapshot of branches, staging area and work tree
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
    pub current_branch: String,
    /// every branch name, sorted
    pub branches: Vec<String>,
    /// paths staged for addition
    pub staged: Vec<String>,
    /// paths staged for removal
    pub removed: Vec<String>,
    /// tracked or staged paths whose work tree copy differs
    pub unstaged: BTreeMap<String, FileChange>,
    /// work tree files neither staged nor tracked
    pub untracked: Vec<String>,
}

impl Status {
    /// nothing staged, removed, modified or untracked
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.removed.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for branch in &self.branches {
            if *branch == self.current_branch {
                writeln!(f, "*{}", branch)?;
            } else {
                writeln!(f, "{}", branch)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "=== Staged Files ===")?;
        for path in &self.staged {
            writeln!(f, "{}", path)?;
        }

        writeln!(f)?;
        writeln!(f, "=== Removed Files ===")?;
        for path in &self.removed {
            writeln!(f, "{}", path)?;
        }

        writeln!(f)?;
        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for (path, change) in &self.unstaged {
            writeln!(f, "{} ({})", path, change)?;
        }

        writeln!(f)?;
        writeln!(f, "=== Untracked Files ===")?;
        for path in &self.untracked {
            writeln!(f, "{}", path)?;
        }

        Ok(())
    }
}
