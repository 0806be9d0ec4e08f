//! Classify a path as source root, package root, or package item.
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{FsError, ItemizeError};
use crate::fs::Filesystem;
use crate::paths::SourcePath;

/// Name of the entry that marks a directory as a source.
pub const SOURCE_MARKER: &str = ".linkfarm";

/// Whether `dir` directly contains the source sentinel.
///
/// # Errors
///
/// Returns an error if the sentinel cannot be looked up for a reason other
/// than its absence.
pub fn is_source(fs: &dyn Filesystem, dir: &Path) -> Result<bool, FsError> {
    let marker = dir.join(SOURCE_MARKER);
    match fs.lstat(&marker) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(FsError::new("lstat", marker, e)),
    }
}

/// Find the closest directory at or above `path` that is a source.
///
/// # Errors
///
/// Returns [`ItemizeError::NotInSource`] once the filesystem root has been
/// checked without finding a sentinel.
pub fn find_source(fs: &dyn Filesystem, path: &Path) -> Result<PathBuf, ItemizeError> {
    for dir in path.ancestors() {
        if dir.as_os_str().is_empty() {
            break;
        }
        if is_source(fs, dir)? {
            return Ok(dir.to_path_buf());
        }
    }
    Err(ItemizeError::NotInSource(path.to_path_buf()))
}

/// Resolve `path` to the package item it names.
///
/// # Errors
///
/// Returns [`ItemizeError::IsSource`] or [`ItemizeError::IsPackage`] when
/// `path` is a source or package directory rather than an item, and
/// [`ItemizeError::NotInSource`] when no source encloses it.
pub fn itemize(fs: &dyn Filesystem, path: &Path) -> Result<SourcePath, ItemizeError> {
    let source = find_source(fs, path)?;
    let rest = path.strip_prefix(&source).unwrap_or_else(|_| Path::new(""));

    let mut components = rest.components();
    let package = match components.next() {
        Some(Component::Normal(name)) => name.to_os_string(),
        _ => return Err(ItemizeError::IsSource(path.to_path_buf())),
    };
    let item = components.as_path();
    if item.as_os_str().is_empty() {
        return Err(ItemizeError::IsPackage(path.to_path_buf()));
    }
    Ok(SourcePath::new(source, package, item))
}
