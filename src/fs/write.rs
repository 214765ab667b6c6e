use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::repo::Repo;

/// write `content` to `dest` so that readers see either nothing or the whole file
///
/// temp file in the repo tmp dir -> fsync -> rename -> fsync parent directory.
pub fn write_atomic(repo: &Repo, dest: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }

    let tmp_path = repo.tmp_path().join(uuid::Uuid::new_v4().to_string());
    {
        let mut tmp_file = File::create(&tmp_path).with_path(&tmp_path)?;
        tmp_file.write_all(content).with_path(&tmp_path)?;
        tmp_file.sync_all().with_path(&tmp_path)?;
    }

    if let Err(e) = fs::rename(&tmp_path, dest) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_path(dest);
    }

    if let Some(parent) = dest.parent() {
        fsync_dir(parent)?;
    }

    Ok(())
}

/// fsync a directory
pub fn fsync_dir(path: &Path) -> Result<()> {
    let dir = File::open(path).with_path(path)?;
    dir.sync_all().with_path(path)?;
    Ok(())
}

/// write a work tree file, creating parent directories as needed
///
/// links are never followed: a symlink at the path is replaced, and an
/// ancestor that exists as anything but a real directory is an error. a
/// directory at the path is removed only if it holds no files.
pub fn write_work_file(root: &Path, path: &str, content: &[u8]) -> Result<()> {
    let full = root.join(path);

    let mut ancestor = root.to_path_buf();
    let mut parts: Vec<&str> = path.split('/').collect();
    parts.pop();
    for part in parts {
        ancestor.push(part);
        match fs::symlink_metadata(&ancestor) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(not_a_directory()).with_path(&ancestor),
            Err(e) if e.kind() == ErrorKind::NotFound => break,
            Err(e) => return Err(e).with_path(&ancestor),
        }
    }

    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }

    match fs::symlink_metadata(&full) {
        Ok(meta) if meta.is_dir() => remove_empty_dirs(&full)?,
        Ok(meta) if !meta.is_file() => fs::remove_file(&full).with_path(&full)?,
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e).with_path(&full),
    }

    fs::write(&full, content).with_path(&full)
}

fn not_a_directory() -> io::Error {
    io::Error::new(ErrorKind::AlreadyExists, "exists and is not a directory")
}

/// remove `dir` when it holds nothing but (possibly nested) empty directories
fn remove_empty_dirs(dir: &Path) -> Result<()> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir).contents_first(true) {
        let entry = entry.map_err(|e| Error::Io {
            path: dir.to_path_buf(),
            source: e
                .into_io_error()
                .unwrap_or_else(|| io::Error::new(ErrorKind::Other, "walkdir error")),
        })?;
        if !entry.file_type().is_dir() {
            return Err(io::Error::new(ErrorKind::AlreadyExists, "directory is not empty")).with_path(dir);
        }
        dirs.push(entry.into_path());
    }

    for d in dirs {
        fs::remove_dir(&d).with_path(&d)?;
    }
    Ok(())
}

/// remove a work tree file if present, then prune directories it leaves empty
pub fn remove_work_file(root: &Path, path: &str) -> Result<()> {
    let full = root.join(path);
    match fs::remove_file(&full) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).with_path(&full),
    }

    let mut dir = full.parent();
    while let Some(d) = dir {
        if d == root {
            break;
        }
        // stops at the first non-empty directory
        if fs::remove_dir(d).is_err() {
            break;
        }
        dir = d.parent();
    }

    Ok(())
}
