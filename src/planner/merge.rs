use std::path::Path;

use super::Planner;
use crate::error::{ItemizeError, PlanError};
use crate::itemize;
use crate::paths::{SourcePath, TargetPath};

impl Planner<'_> {
    /// Replace the directory link at `target` with a real directory by
    /// walking its destination `dest` into the index.
    ///
    /// `dest` must be an item of some package, or a package root, in which
    /// case the whole package is walked.
    pub(super) fn merge(&mut self, dest: &Path, target: &TargetPath) -> Result<(), PlanError> {
        let root = match itemize::itemize(self.fs, dest) {
            Ok(root) => root,
            Err(ItemizeError::IsPackage(_)) => package_root_of(dest).ok_or_else(|| {
                PlanError::Merge {
                    path: dest.to_path_buf(),
                    source: ItemizeError::IsSource(dest.to_path_buf()),
                }
            })?,
            Err(ItemizeError::Io(e)) => return Err(e.into()),
            Err(source) => {
                return Err(PlanError::Merge {
                    path: dest.to_path_buf(),
                    source,
                });
            }
        };

        tracing::debug!(
            target = %target.full().display(),
            from = %root.full().display(),
            "merging directory link"
        );
        self.walk(&root, target)
    }
}

fn package_root_of(dir: &Path) -> Option<SourcePath> {
    let source = dir.parent()?;
    let name = dir.file_name()?;
    Some(SourcePath::package_root(source, name))
}
