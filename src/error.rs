//! Domain-specific error types for the link farm engine.
//!
//! Internal modules return typed errors (e.g., [`PlanError`], [`ApplyError`])
//! while the binary converts them to [`anyhow::Error`] at the boundary via
//! the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! LinkfarmError
//! ├── Config(ConfigError)  — option resolution and validation (usage)
//! ├── Plan(PlanError)      — itemization, conflicts, merges, I/O while planning
//! └── Apply(ApplyError)    — a plan action that failed against the target
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::plan::Action;
use crate::state::{FileType, State};

/// Top-level error type for the engine.
///
/// Aggregates the sub-errors of each phase and is convertible to
/// [`anyhow::Error`] for use at the command boundary.
#[derive(Error, Debug)]
pub enum LinkfarmError {
    /// Usage or option validation error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Planning failed; the target was not touched.
    #[error("Planning failed: {0}")]
    Plan(#[from] PlanError),

    /// Applying a plan failed part way.
    #[error("Apply failed: {0}")]
    Apply(#[from] ApplyError),
}

/// A filesystem call that failed, with the path it was made on.
#[derive(Error, Debug)]
#[error("{op} {}: {source}", .path.display())]
pub struct FsError {
    /// Short name of the operation (`lstat`, `read link`, …).
    pub op: &'static str,
    /// Path the operation was applied to.
    pub path: PathBuf,
    /// Underlying I/O error.
    #[source]
    pub source: io::Error,
}

impl FsError {
    /// Wrap `source` with the operation name and path.
    pub fn new(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Errors raised resolving a path to `(source, package, item)`.
#[derive(Error, Debug)]
pub enum ItemizeError {
    /// No ancestor of the path carries the source sentinel.
    #[error("{} is not in a package", .0.display())]
    NotInSource(PathBuf),

    /// The path is the source directory itself.
    #[error("{} is a source directory", .0.display())]
    IsSource(PathBuf),

    /// The path is a package directory, not an item inside one.
    #[error("{} is a package directory", .0.display())]
    IsPackage(PathBuf),

    /// Looking for the sentinel failed for a reason other than absence.
    #[error(transparent)]
    Io(#[from] FsError),
}

/// Why an item cannot be placed at its target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// A regular file already occupies the target.
    FileInTheWay,
    /// The target is a real directory but the item is not a directory.
    DirectoryExpected,
    /// The target is neither file, directory nor symlink.
    UnknownType,
    /// The target is a foreign link whose destination is not a directory.
    LinkToNonDirectory,
    /// The target is a directory link but the item is not a directory.
    NonDirectoryOverLink,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FileInTheWay => "a file is in the way",
            Self::DirectoryExpected => "only a directory can be placed over a directory",
            Self::UnknownType => "target has an unsupported file type",
            Self::LinkToNonDirectory => "existing link does not point to a directory",
            Self::NonDirectoryOverLink => "cannot replace a directory link with a non-directory",
        };
        f.write_str(s)
    }
}

/// An item whose placement is incompatible with the target's occupant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "conflict: {} ({item_type}) cannot be placed at {} ({target_state}): {kind}",
    .item.display(),
    .target.display()
)]
pub struct Conflict {
    /// Full source path of the offending item.
    pub item: PathBuf,
    /// Type of the offending item.
    pub item_type: FileType,
    /// Full target path.
    pub target: PathBuf,
    /// State the target held when the decision was made.
    pub target_state: State,
    /// Which rule rejected the placement.
    pub kind: ConflictKind,
}

/// Errors that abort planning. None of them touch the target filesystem.
#[derive(Error, Debug)]
pub enum PlanError {
    /// A path could not be classified.
    #[error(transparent)]
    Itemize(#[from] ItemizeError),

    /// A merge could not classify the destination of an existing link.
    #[error("merge {}: {source}", .path.display())]
    Merge {
        /// Destination of the link being merged.
        path: PathBuf,
        /// Classification failure.
        source: ItemizeError,
    },

    /// An item conflicts with the target's occupant.
    #[error(transparent)]
    Conflict(#[from] Box<Conflict>),

    /// A requested package does not exist in the source.
    #[error("package '{name}' not found in {}", .source_dir.display())]
    MissingPackage {
        /// Requested package name.
        name: String,
        /// Source directory that was searched.
        source_dir: PathBuf,
    },

    /// Filesystem failure while planning.
    #[error(transparent)]
    Io(#[from] FsError),
}

impl From<Conflict> for PlanError {
    fn from(conflict: Conflict) -> Self {
        Self::Conflict(Box::new(conflict))
    }
}

/// An action of a plan failed against the target filesystem.
#[derive(Error, Debug)]
#[error("{}: {action}: {source}", .item.display())]
pub struct ApplyError {
    /// Item path relative to the target.
    pub item: PathBuf,
    /// Action that failed.
    pub action: Action,
    /// Underlying filesystem failure.
    #[source]
    pub source: FsError,
}

/// Errors that arise resolving and validating run options.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A directory option points nowhere usable.
    #[error("{what} directory {} does not exist", .path.display())]
    MissingDirectory {
        /// Which option (`source` or `target`).
        what: &'static str,
        /// Path as given.
        path: PathBuf,
    },

    /// A directory option points at something that is not a directory.
    #[error("{what} {} is not a directory", .path.display())]
    NotADirectory {
        /// Which option (`source` or `target`).
        what: &'static str,
        /// Resolved path.
        path: PathBuf,
    },

    /// The source directory carries no sentinel.
    #[error("{} is not a source: missing {marker}", .path.display())]
    NotASource {
        /// Resolved source directory.
        path: PathBuf,
        /// Expected sentinel name.
        marker: &'static str,
    },

    /// A package name is not a single plain path component.
    #[error("invalid package name '{0}'")]
    InvalidPackage(String),

    /// No packages were requested.
    #[error("no packages given")]
    NoPackages,

    /// The source is the filesystem root, so no default target exists.
    #[error("{} has no parent directory to use as target", .0.display())]
    NoDefaultTarget(PathBuf),

    /// The working directory could not be determined.
    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// Looking for the source sentinel failed.
    #[error(transparent)]
    Io(#[from] FsError),
}
