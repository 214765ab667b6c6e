mod commit;
mod status;

pub use commit::{now, Commit, INITIAL_MESSAGE};
pub use status::{FileChange, Status};
