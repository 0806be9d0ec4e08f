use super::{Decision, Planner};
use crate::error::{FsError, PlanError};
use crate::paths::{SourceItem, SourcePath, TargetItem, TargetPath};
use crate::state::FileType;

impl Planner<'_> {
    /// Install every entry below `dir` at the matching place below `target`,
    /// depth first, in name order.
    pub(super) fn walk(&mut self, dir: &SourcePath, target: &TargetPath) -> Result<(), PlanError> {
        let full = dir.full();
        let entries = self
            .fs
            .read_dir(&full)
            .map_err(|e| FsError::new("read directory", full, e))?;

        for entry in entries {
            let item = SourceItem {
                path: dir.join(&entry.name),
                file_type: entry.file_type,
            };
            let at = target.join(&entry.name);
            let state = self.index.query(self.fs, &at.full())?.clone();
            let target_item = TargetItem { path: at, state };

            let decision = self.install(&item, &target_item)?;
            tracing::debug!(
                item = %item.path.full().display(),
                planned = %decision.state(),
                "placed"
            );
            let descend =
                matches!(decision, Decision::Continue(_)) && item.file_type == FileType::Dir;
            self.index
                .update(&target_item.path.full(), decision.into_state());

            if descend {
                self.walk(&item.path, &target_item.path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::path::{Path, PathBuf};

    use crate::error::PlanError;
    use crate::fs::RealFs;
    use crate::itemize::SOURCE_MARKER;
    use crate::plan::Action;
    use crate::planner::Planner;
    use crate::state::{FileType, State};

    struct Tree {
        _dir: tempfile::TempDir,
        source: PathBuf,
        target: PathBuf,
    }

    fn tree(files: &[&str], dirs: &[&str]) -> Tree {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(source.join(SOURCE_MARKER), "").unwrap();
        for d in dirs {
            std::fs::create_dir_all(source.join(d)).unwrap();
        }
        for f in files {
            let path = source.join(f);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
        }
        Tree { _dir: dir, source, target }
    }

    #[test]
    fn fresh_install_links_top_level_entries_only() {
        let t = tree(&["pkg/a", "pkg/d/b"], &[]);
        let plan = Planner::new(&RealFs, &t.source, &t.target)
            .plan(&["pkg"])
            .unwrap();

        let items: Vec<&Path> = plan.tasks().keys().map(PathBuf::as_path).collect();
        assert_eq!(items, [Path::new("a"), Path::new("d")]);
        assert_eq!(
            plan.tasks()[Path::new("d")].actions(),
            &[Action::Symlink {
                dest: PathBuf::from("../source/pkg/d")
            }]
        );
    }

    #[test]
    fn second_package_merges_into_first_link() {
        let t = tree(&["p1/d/x", "p2/d/y"], &[]);
        let plan = Planner::new(&RealFs, &t.source, &t.target)
            .plan(&["p1", "p2"])
            .unwrap();

        assert_eq!(plan.tasks()[Path::new("d")].actions(), &[Action::Mkdir]);
        assert_eq!(
            plan.tasks()[Path::new("d/x")].actions(),
            &[Action::Symlink {
                dest: PathBuf::from("../../source/p1/d/x")
            }]
        );
        assert_eq!(
            plan.tasks()[Path::new("d/y")].actions(),
            &[Action::Symlink {
                dest: PathBuf::from("../../source/p2/d/y")
            }]
        );
    }

    #[test]
    fn real_directory_is_descended() {
        let t = tree(&["pkg/d/x"], &[]);
        std::fs::create_dir(t.target.join("d")).unwrap();
        let mut planner = Planner::new(&RealFs, &t.source, &t.target);
        planner.install_package("pkg").unwrap();

        assert_eq!(
            planner.index().get(&t.target.join("d")).unwrap().planned,
            State::Dir
        );
        assert_eq!(
            planner.index().get(&t.target.join("d/x")).unwrap().planned,
            State::symlink("../../source/pkg/d/x", FileType::File)
        );
    }

    #[test]
    fn empty_package_plans_nothing() {
        let t = tree(&[], &["pkg"]);
        let plan = Planner::new(&RealFs, &t.source, &t.target)
            .plan(&["pkg"])
            .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn conflict_aborts_planning() {
        let t = tree(&["pkg/a"], &[]);
        std::fs::write(t.target.join("a"), "occupied").unwrap();
        let err = Planner::new(&RealFs, &t.source, &t.target)
            .plan(&["pkg"])
            .unwrap_err();
        assert!(matches!(err, PlanError::Conflict(ref c) if c.target == t.target.join("a")));
    }
}
