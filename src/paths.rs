//! Source- and target-side item addressing.
//!
//! An item is addressed by its path relative to its package. The same
//! relative path names its target counterpart under the target directory,
//! which is what lets the planner compute link text between the two.
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::state::{FileType, State};

/// Normalize a path by processing `.` and `..` components lexically.
/// This does not access the filesystem and does not follow symlinks.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    result.push(component);
                }
            }
            _ => result.push(component),
        }
    }
    result
}

/// An item inside a package of a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    /// Source directory (the one holding the sentinel).
    pub source: PathBuf,
    /// Package name: a direct child directory of the source. Kept as the
    /// raw file name, which need not be UTF-8.
    pub package: OsString,
    /// Path relative to the package; empty for the package root.
    pub item: PathBuf,
}

impl SourcePath {
    /// Address `item` inside `package`.
    pub fn new(
        source: impl Into<PathBuf>,
        package: impl Into<OsString>,
        item: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            package: package.into(),
            item: item.into(),
        }
    }

    /// Address the root of `package`.
    pub fn package_root(source: impl Into<PathBuf>, package: impl Into<OsString>) -> Self {
        Self::new(source, package, PathBuf::new())
    }

    /// Directory of the package.
    #[must_use]
    pub fn package_dir(&self) -> PathBuf {
        self.source.join(&self.package)
    }

    /// Full path of the item.
    #[must_use]
    pub fn full(&self) -> PathBuf {
        self.package_dir().join(&self.item)
    }

    /// Same package, different item.
    #[must_use]
    pub fn with_item(&self, item: impl Into<PathBuf>) -> Self {
        Self {
            source: self.source.clone(),
            package: self.package.clone(),
            item: item.into(),
        }
    }

    /// The child `name` of this item.
    #[must_use]
    pub fn join(&self, name: impl AsRef<Path>) -> Self {
        self.with_item(self.item.join(name))
    }
}

/// A location under the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
    /// Target directory.
    pub target: PathBuf,
    /// Path relative to the target; empty for the target root.
    pub item: PathBuf,
}

impl TargetPath {
    /// Address `item` under `target`.
    pub fn new(target: impl Into<PathBuf>, item: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            item: item.into(),
        }
    }

    /// The target directory itself.
    pub fn root(target: impl Into<PathBuf>) -> Self {
        Self::new(target, PathBuf::new())
    }

    /// Full path of the location.
    #[must_use]
    pub fn full(&self) -> PathBuf {
        self.target.join(&self.item)
    }

    /// The child `name` of this location.
    #[must_use]
    pub fn join(&self, name: impl AsRef<Path>) -> Self {
        Self::new(self.target.clone(), self.item.join(name))
    }

    /// Directory that holds this location.
    fn parent_dir(&self) -> PathBuf {
        let full = self.full();
        full.parent().map_or(full.clone(), Path::to_path_buf)
    }

    /// Link text that, placed at this location, points to `to`.
    ///
    /// Falls back to `to` itself when no relative path exists (e.g. a
    /// different drive on Windows).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::{Path, PathBuf};
    /// use linkfarm::paths::TargetPath;
    ///
    /// let at = TargetPath::new("/home/me", ".config/nvim");
    /// assert_eq!(
    ///     at.relative_to(Path::new("/home/me/dots/nvim/.config/nvim")),
    ///     PathBuf::from("../dots/nvim/.config/nvim"),
    /// );
    /// ```
    #[must_use]
    pub fn relative_to(&self, to: &Path) -> PathBuf {
        pathdiff::diff_paths(to, self.parent_dir())
            .filter(|p| !p.is_absolute())
            .unwrap_or_else(|| to.to_path_buf())
    }

    /// Resolve link text found at this location back to a full path.
    #[must_use]
    pub fn resolve(&self, link_text: &Path) -> PathBuf {
        crate::state::resolve_link_text(&self.full(), link_text)
    }
}

/// A package entry visited by a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceItem {
    /// Where the entry lives.
    pub path: SourcePath,
    /// Type of the entry, without following symlinks.
    pub file_type: FileType,
}

/// The target-side counterpart of a [`SourceItem`] at visit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetItem {
    /// Where the counterpart lives.
    pub path: TargetPath,
    /// Its planned state when visited.
    pub state: State,
}
