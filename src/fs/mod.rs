//! Filesystem capability used by the planner and the plan executor.
//!
//! The engine never calls `std::fs` directly; everything goes through
//! [`Filesystem`] so that planning can be exercised against mocks and the
//! OS-specific details live in one adapter ([`RealFs`]).
mod real;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

pub use real::RealFs;

use crate::state::FileType;

/// Permission bits for directories created by a plan.
pub const DIR_MODE: u32 = 0o755;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File name of the entry.
    pub name: OsString,
    /// Type of the entry, without following symlinks.
    pub file_type: FileType,
}

impl DirEntry {
    /// Create an entry.
    pub fn new(name: impl Into<OsString>, file_type: FileType) -> Self {
        Self {
            name: name.into(),
            file_type,
        }
    }
}

/// Filesystem operations the engine depends on.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem {
    /// Type of the entry at `path`, not following a final symlink.
    ///
    /// A missing entry is an error of kind [`io::ErrorKind::NotFound`].
    fn lstat(&self, path: &Path) -> io::Result<FileType>;

    /// Raw text of the symlink at `path`.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Entries of the directory at `path`, sorted by name.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Create a single directory with the given permission bits.
    fn mkdir(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Remove a file, a symlink, or an empty directory.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Create a symlink at `link` whose text is `original`.
    fn symlink(&self, original: &Path, link: &Path) -> io::Result<()>;
}
