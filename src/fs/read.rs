use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::repo::META_DIR;

/// list every non-directory entry in the work tree as a `/`-separated relative path
///
/// symlinks are listed but never followed. the metadata directory is skipped,
/// as are names that are not valid UTF-8.
pub fn list_work_files(root: &Path) -> Result<BTreeSet<String>> {
    let mut files = BTreeSet::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == META_DIR));

    for entry in walker {
        let entry = entry.map_err(|e| Error::Io {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walkdir error")),
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };

        match logical_path(rel) {
            Some(path) => {
                files.insert(path);
            }
            None => tracing::warn!(path = %entry.path().display(), "skipping non-utf8 path"),
        }
    }

    Ok(files)
}

/// read a work tree file, `None` if it does not exist
pub fn read_work_file(root: &Path, path: &str) -> Result<Option<Vec<u8>>> {
    let full = root.join(path);
    match fs::read(&full) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_path(full),
    }
}

/// normalize user input into a tracked path
///
/// accepts `./a/b.txt` or `a//b.txt`; rejects empty, absolute, escaping and
/// metadata-internal paths.
pub fn normalize_path(input: &str) -> Result<String> {
    let invalid = || Error::InvalidPath(input.to_string());

    let mut parts = Vec::new();
    for component in Path::new(input).components() {
        match component {
            Component::Normal(name) => parts.push(name.to_str().ok_or_else(invalid)?),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid())
            }
        }
    }

    if parts.is_empty() || parts[0] == META_DIR {
        return Err(invalid());
    }

    Ok(parts.join("/"))
}

fn logical_path(rel: &Path) -> Option<String> {
    let parts: Option<Vec<&str>> = rel
        .components()
        .map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect();
    parts.map(|p| p.join("/"))
}
