//! Planning session: walks requested packages into one shared [`Index`].
//!
//! This module is split into sub-modules:
//!
//! - [`install`]: the per-item placement decision
//! - `merge`: turning an existing directory link into a real directory
//! - `walk`: depth-first traversal of a package or item subtree
//!
//! Planning reads the target but never changes it; everything decided here
//! ends up in a [`Plan`] that is applied (or printed) afterwards.

pub mod install;
mod merge;
mod walk;

use std::fmt;
use std::path::PathBuf;

pub use install::Decision;

use crate::error::PlanError;
use crate::fs::Filesystem;
use crate::index::Index;
use crate::paths::{SourcePath, TargetPath};
use crate::plan::Plan;
use crate::state::{self, FileType, State};

/// One planning run against a source and a target.
///
/// Owns the [`Index`] for the run. Packages are installed in the order they
/// are requested; the first package to reach a target path links it, and
/// every later package whose item lands on the same directory link merges
/// into it.
pub struct Planner<'a> {
    fs: &'a dyn Filesystem,
    source: PathBuf,
    target: PathBuf,
    index: Index,
}

impl fmt::Debug for Planner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<'a> Planner<'a> {
    /// Start a run installing packages of `source` into `target`.
    pub fn new(fs: &'a dyn Filesystem, source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            source: source.into(),
            target: target.into(),
            index: Index::new(),
        }
    }

    /// Plan the installation of every package in `packages`, in order.
    ///
    /// # Errors
    ///
    /// Returns the first error of any package; nothing is planned then.
    pub fn plan<S: AsRef<str>>(mut self, packages: &[S]) -> Result<Plan, PlanError> {
        for package in packages {
            self.install_package(package.as_ref())?;
        }
        tracing::debug!(paths = self.index.len(), "index complete");
        Ok(self.into_plan())
    }

    /// Walk one package into the index.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::MissingPackage`] if the package is not a
    /// directory of the source, or the first error of the walk.
    pub fn install_package(&mut self, name: &str) -> Result<(), PlanError> {
        let root = SourcePath::package_root(&self.source, name);
        let is_dir = match state::stat(self.fs, &root.package_dir())? {
            State::Dir => true,
            State::Symlink { dest_type, .. } => dest_type == FileType::Dir,
            _ => false,
        };
        if !is_dir {
            return Err(PlanError::MissingPackage {
                name: name.to_string(),
                source_dir: self.source.clone(),
            });
        }

        tracing::debug!(package = name, "walking package");
        self.walk(&root, &TargetPath::root(&self.target))
    }

    /// Index accumulated so far.
    #[must_use]
    pub const fn index(&self) -> &Index {
        &self.index
    }

    /// Finish the run and diff the index into a plan.
    #[must_use]
    pub fn into_plan(self) -> Plan {
        Plan::new(&self.target, &self.index)
    }
}
