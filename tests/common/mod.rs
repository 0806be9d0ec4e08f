// Shared helpers for integration tests.
//
// Provides a temporary source/target pair and a fluent builder so each test
// can lay out packages and pre-existing target entries without repeating
// filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use linkfarm::config::Options;
use linkfarm::fs::RealFs;
use linkfarm::itemize::SOURCE_MARKER;
use linkfarm::logging::Logger;
use linkfarm::plan::Plan;
use linkfarm::planner::Planner;

/// A source directory (with sentinel) and an empty target directory, side
/// by side inside a [`tempfile::TempDir`].
pub struct Farm {
    _root: tempfile::TempDir,
    /// Canonical source directory.
    pub source: PathBuf,
    /// Canonical target directory.
    pub target: PathBuf,
}

impl Farm {
    /// Begin building a farm.
    pub fn builder() -> FarmBuilder {
        FarmBuilder::new()
    }

    /// Validated options for installing `packages`.
    pub fn options(&self, packages: &[&str], dry_run: bool) -> Options {
        let packages: Vec<String> = packages.iter().map(ToString::to_string).collect();
        Options::build(&self.source, Some(self.target.as_path()), &packages, dry_run, &RealFs)
            .expect("valid options")
    }

    /// Plan `packages` without applying anything.
    pub fn plan(&self, packages: &[&str]) -> Result<Plan, linkfarm::error::PlanError> {
        Planner::new(&RealFs, &self.source, &self.target).plan(packages)
    }

    /// Run the install command for `packages`.
    pub fn install(&self, packages: &[&str]) -> anyhow::Result<()> {
        let mut out = Vec::new();
        linkfarm::commands::install::execute(
            &self.options(packages, false),
            &RealFs,
            &Logger::default(),
            &mut out,
        )?;
        assert!(out.is_empty(), "a real run prints nothing to stdout");
        Ok(())
    }

    /// Run the install command as a dry run and return what it printed.
    pub fn dry_run(&self, packages: &[&str]) -> anyhow::Result<String> {
        let mut out = Vec::new();
        linkfarm::commands::install::execute(
            &self.options(packages, true),
            &RealFs,
            &Logger::default(),
            &mut out,
        )?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    /// Link text of the symlink at `item` under the target, if it is one.
    pub fn link(&self, item: &str) -> Option<PathBuf> {
        std::fs::read_link(self.target.join(item)).ok()
    }

    /// Whether `item` under the target is a real (non-link) directory.
    pub fn is_real_dir(&self, item: &str) -> bool {
        std::fs::symlink_metadata(self.target.join(item)).is_ok_and(|m| m.file_type().is_dir())
    }

    /// Every entry under the target, depth first, one line per entry.
    pub fn target_listing(&self) -> Vec<String> {
        let mut lines = Vec::new();
        list(&self.target, Path::new(""), &mut lines);
        lines
    }
}

fn list(root: &Path, rel: &Path, lines: &mut Vec<String>) {
    let mut entries: Vec<_> = std::fs::read_dir(root.join(rel))
        .expect("read target dir")
        .map(|e| e.expect("dir entry").file_name())
        .collect();
    entries.sort();
    for name in entries {
        let rel = rel.join(name);
        let meta = std::fs::symlink_metadata(root.join(&rel)).expect("lstat");
        if meta.file_type().is_symlink() {
            let text = std::fs::read_link(root.join(&rel)).expect("read link");
            lines.push(format!("{} -> {}", rel.display(), text.display()));
        } else if meta.is_dir() {
            lines.push(format!("{}/", rel.display()));
            list(root, &rel, lines);
        } else {
            lines.push(rel.display().to_string());
        }
    }
}

/// Fluent builder for [`Farm`].
pub struct FarmBuilder {
    root: tempfile::TempDir,
    source: PathBuf,
    target: PathBuf,
}

impl FarmBuilder {
    /// An empty source (sentinel only) and an empty target.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let base = dunce::canonicalize(root.path()).expect("canonical temp dir");
        let source = base.join("source");
        let target = base.join("target");
        std::fs::create_dir_all(&source).expect("create source");
        std::fs::create_dir_all(&target).expect("create target");
        std::fs::write(source.join(SOURCE_MARKER), "").expect("write sentinel");
        Self {
            root,
            source,
            target,
        }
    }

    /// Create an empty package directory.
    pub fn package(self, name: &str) -> Self {
        std::fs::create_dir_all(self.source.join(name)).expect("create package");
        self
    }

    /// Create a regular file at `path` under the source, with parents.
    pub fn file(self, path: &str) -> Self {
        write_file(&self.source.join(path));
        self
    }

    /// Create a directory at `path` under the source, with parents.
    pub fn dir(self, path: &str) -> Self {
        std::fs::create_dir_all(self.source.join(path)).expect("create source dir");
        self
    }

    /// Create a symlink at `path` under the source with text `text`.
    #[cfg(unix)]
    pub fn link(self, path: &str, text: &str) -> Self {
        make_link(&self.source.join(path), text);
        self
    }

    /// Create a regular file at `path` under the target.
    pub fn target_file(self, path: &str) -> Self {
        write_file(&self.target.join(path));
        self
    }

    /// Create a directory at `path` under the target.
    pub fn target_dir(self, path: &str) -> Self {
        std::fs::create_dir_all(self.target.join(path)).expect("create target dir");
        self
    }

    /// Create a symlink at `path` under the target with text `text`.
    #[cfg(unix)]
    pub fn target_link(self, path: &str, text: &str) -> Self {
        make_link(&self.target.join(path), text);
        self
    }

    /// Finish building.
    pub fn build(self) -> Farm {
        Farm {
            _root: self.root,
            source: self.source,
            target: self.target,
        }
    }
}

fn write_file(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, "").expect("write file");
}

#[cfg(unix)]
fn make_link(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::os::unix::fs::symlink(text, path).expect("create symlink");
}
