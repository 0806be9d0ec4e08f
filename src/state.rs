//! On-disk state of a path: file type and, for symlinks, destination.
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::FsError;
use crate::fs::Filesystem;
use crate::paths::normalize_path;

/// Type of a filesystem entry, as seen without following a final symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Nothing exists at the path.
    None,
    /// Regular file.
    File,
    /// Real directory.
    Dir,
    /// Symbolic link.
    Symlink,
    /// Anything else (device, socket, fifo, …).
    Other,
}

impl FileType {
    /// Classify [`std::fs::FileType`] obtained from `symlink_metadata`.
    #[must_use]
    pub fn from_std(ft: std::fs::FileType) -> Self {
        if ft.is_symlink() {
            Self::Symlink
        } else if ft.is_dir() {
            Self::Dir
        } else if ft.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::File => "file",
            Self::Dir => "dir",
            Self::Symlink => "symlink",
            Self::Other => "other",
        })
    }
}

/// State of a target path.
///
/// A symlink carries its raw link text and the type of what that text
/// resolves to; no other state has a destination.
///
/// # Examples
///
/// ```
/// use linkfarm::state::{FileType, State};
///
/// let link = State::symlink("../source/pkg/item", FileType::File);
/// assert_eq!(link.file_type(), FileType::Symlink);
/// assert_ne!(link, State::None);
/// assert_eq!(State::None, State::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum State {
    /// Nothing exists.
    #[default]
    None,
    /// Regular file.
    File,
    /// Real directory.
    Dir,
    /// Symbolic link.
    Symlink {
        /// Link text as stored in the link.
        dest: PathBuf,
        /// Type of the resolved destination ([`FileType::None`] if dangling).
        dest_type: FileType,
    },
    /// Unsupported entry type.
    Other,
}

impl State {
    /// Build a symlink state.
    pub fn symlink(dest: impl Into<PathBuf>, dest_type: FileType) -> Self {
        Self::Symlink {
            dest: dest.into(),
            dest_type,
        }
    }

    /// The entry's own type.
    #[must_use]
    pub const fn file_type(&self) -> FileType {
        match self {
            Self::None => FileType::None,
            Self::File => FileType::File,
            Self::Dir => FileType::Dir,
            Self::Symlink { .. } => FileType::Symlink,
            Self::Other => FileType::Other,
        }
    }

    /// State of a non-link entry of the given type.
    const fn plain(ft: FileType) -> Self {
        match ft {
            FileType::None => Self::None,
            FileType::File => Self::File,
            FileType::Dir => Self::Dir,
            FileType::Symlink | FileType::Other => Self::Other,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symlink { dest, dest_type } => {
                write!(f, "symlink -> {} ({dest_type})", dest.display())
            }
            other => fmt::Display::fmt(&other.file_type(), f),
        }
    }
}

/// Read the current state of `path`.
///
/// A missing path is [`State::None`]. For a symlink the link text is read
/// and resolved against the link's parent; a missing destination is
/// reported as [`FileType::None`], not as an error.
///
/// # Errors
///
/// Returns an error for any `lstat` or `readlink` failure other than a
/// missing entry.
pub fn stat(fs: &dyn Filesystem, path: &Path) -> Result<State, FsError> {
    let ft = match fs.lstat(path) {
        Ok(ft) => ft,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(State::None),
        Err(e) => return Err(FsError::new("lstat", path, e)),
    };
    if ft != FileType::Symlink {
        return Ok(State::plain(ft));
    }

    let dest = fs
        .read_link(path)
        .map_err(|e| FsError::new("read link", path, e))?;
    let resolved = resolve_link_text(path, &dest);
    let dest_type = match fs.lstat(&resolved) {
        Ok(ft) => ft,
        Err(e) if e.kind() == io::ErrorKind::NotFound => FileType::None,
        Err(e) => return Err(FsError::new("lstat", resolved, e)),
    };
    Ok(State::Symlink { dest, dest_type })
}

/// Resolve link text found at `link` to a normalised path.
pub(crate) fn resolve_link_text(link: &Path, dest: &Path) -> PathBuf {
    if dest.is_absolute() {
        return normalize_path(dest);
    }
    let parent = link.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&parent.join(dest))
}
