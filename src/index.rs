//! Per-run cache of current and planned target states.
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use crate::error::FsError;
use crate::fs::Filesystem;
use crate::state::{self, State};

/// The current and planned state of one target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spec {
    /// State on disk when the path was first touched. Never changes afterwards.
    pub current: State,
    /// State the run has decided on so far.
    pub planned: State,
}

impl Spec {
    /// Whether the plan changes this path.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.current != self.planned
    }
}

/// Target paths touched during one run, keyed by full path.
#[derive(Debug, Default)]
pub struct Index {
    entries: BTreeMap<PathBuf, Spec>,
}

impl Index {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Planned state of `path`, reading its current state on first touch.
    ///
    /// If the parent of `path` is already indexed and is not a real
    /// directory on disk, the path cannot exist independently of it and its
    /// current state is [`State::None`] without asking the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has to be stat'ed and that fails. The
    /// index is left unchanged in that case.
    pub fn query(&mut self, fs: &dyn Filesystem, path: &Path) -> Result<&State, FsError> {
        let shadowed = path
            .parent()
            .and_then(|parent| self.entries.get(parent))
            .is_some_and(|spec| spec.current != State::Dir);

        let spec = match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let current = if shadowed {
                    State::None
                } else {
                    state::stat(fs, path)?
                };
                tracing::trace!(path = %path.display(), %current, "indexed");
                entry.insert(Spec {
                    planned: current.clone(),
                    current,
                })
            }
        };
        Ok(&spec.planned)
    }

    /// Record a new planned state for an already queried `path`.
    pub fn update(&mut self, path: &Path, planned: State) {
        if let Some(spec) = self.entries.get_mut(path) {
            spec.planned = planned;
        } else {
            tracing::warn!(path = %path.display(), "update of unindexed path ignored");
        }
    }

    /// Spec of `path`, if it has been touched.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&Spec> {
        self.entries.get(path)
    }

    /// All touched paths in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Spec)> {
        self.entries.iter().map(|(path, spec)| (path.as_path(), spec))
    }

    /// Number of touched paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::fs::{MockFilesystem, RealFs};
    use crate::state::FileType;
    use std::io;

    #[test]
    fn first_query_reads_disk_then_caches() {
        let mut fs = MockFilesystem::new();
        fs.expect_lstat().times(1).returning(|_| Ok(FileType::File));
        let mut index = Index::new();

        assert_eq!(index.query(&fs, Path::new("/t/a")).unwrap(), &State::File);
        assert_eq!(index.query(&fs, Path::new("/t/a")).unwrap(), &State::File);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn update_changes_planned_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a");
        let mut index = Index::new();
        index.query(&RealFs, &path).unwrap();

        index.update(&path, State::symlink("../x", FileType::File));
        index.update(&path, State::Dir);

        let spec = index.get(&path).unwrap();
        assert_eq!(spec.current, State::None);
        assert_eq!(spec.planned, State::Dir);
        assert!(spec.is_changed());
    }

    #[test]
    fn failed_query_leaves_no_entry() {
        let mut fs = MockFilesystem::new();
        fs.expect_lstat()
            .returning(|_| Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));
        let mut index = Index::new();

        assert!(index.query(&fs, Path::new("/t/a")).is_err());
        assert!(index.is_empty());
    }

    #[test]
    fn child_of_linked_parent_is_shadowed() {
        let mut fs = MockFilesystem::new();
        fs.expect_lstat()
            .withf(|p| p.to_str() == Some("/t/dir"))
            .returning(|_| Ok(FileType::Symlink));
        fs.expect_read_link()
            .returning(|_| Ok(PathBuf::from("../s/pkg/dir")));
        fs.expect_lstat()
            .withf(|p| p.to_str() == Some("/s/pkg/dir"))
            .returning(|_| Ok(FileType::Dir));
        let mut index = Index::new();

        index.query(&fs, Path::new("/t/dir")).unwrap();
        // No expectation exists for /t/dir/a: reaching the filesystem would panic.
        assert_eq!(
            index.query(&fs, Path::new("/t/dir/a")).unwrap(),
            &State::None
        );
    }

    #[test]
    fn child_of_real_directory_is_stated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("d")).unwrap();
        std::fs::write(dir.path().join("d/f"), "").unwrap();
        let mut index = Index::new();

        index.query(&RealFs, &dir.path().join("d")).unwrap();
        assert_eq!(
            index.query(&RealFs, &dir.path().join("d/f")).unwrap(),
            &State::File
        );
    }
}
