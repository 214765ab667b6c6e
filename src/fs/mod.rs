pub mod read;
pub mod write;

pub use read::{list_work_files, normalize_path, read_work_file};
pub use write::{fsync_dir, remove_work_file, write_atomic, write_work_file};
