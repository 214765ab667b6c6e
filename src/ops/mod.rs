//! repository commands
//!
//! each operation takes the repository context and, when it changes anything,
//! the in-memory `RepoState` of the surrounding `Repo::transaction`.

mod add;
mod checkout;
mod commit;
mod init;
mod log;
mod merge;
mod reset;
mod rm;
mod status;

pub use crate::refs::{create_branch as branch, delete_branch as rm_branch};
pub use add::{add, AddOutcome};
pub use checkout::{checkout_branch, checkout_file, checkout_file_at};
pub use commit::{build_commit, commit, commit_with_timestamp, CommitOutcome};
pub use init::{init, init_with_config};
pub use log::{find, global_log, log, LogEntry};
pub use merge::{merge, merge_message, MergeOutcome};
pub use reset::reset;
pub use rm::{rm, RmOutcome};
pub use status::status;
