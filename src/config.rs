//! Resolve and validate the options of one run.
//!
//! Directory options come from the command line or, failing that, from the
//! `LINKFARM_SOURCE` / `LINKFARM_TARGET` environment variables (handled by
//! clap). Whatever is left unset falls back to the current directory for the
//! source and the parent of the resolved source for the target.
use std::path::{Component, Path, PathBuf};

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::fs::Filesystem;
use crate::itemize::{self, SOURCE_MARKER};

/// Validated options for one run. Both directories are canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Source directory; carries the sentinel.
    pub source: PathBuf,
    /// Target directory.
    pub target: PathBuf,
    /// Packages to install, in order.
    pub packages: Vec<String>,
    /// Print the plan instead of applying it.
    pub dry_run: bool,
}

impl Options {
    /// Resolve options from parsed arguments, defaulting the source to the
    /// current directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid option.
    pub fn resolve(cli: &Cli, fs: &dyn Filesystem) -> Result<Self, ConfigError> {
        let source = match &cli.source {
            Some(source) => source.clone(),
            None => std::env::current_dir().map_err(ConfigError::CurrentDir)?,
        };
        Self::build(&source, cli.target.as_deref(), &cli.packages, cli.dry_run, fs)
    }

    /// Resolve options from an explicit source and optional target.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid option.
    pub fn build(
        source: &Path,
        target: Option<&Path>,
        packages: &[String],
        dry_run: bool,
        fs: &dyn Filesystem,
    ) -> Result<Self, ConfigError> {
        let source = canonical_dir("source", source)?;
        if !itemize::is_source(fs, &source)? {
            return Err(ConfigError::NotASource {
                path: source,
                marker: SOURCE_MARKER,
            });
        }

        let target = match target {
            Some(target) => canonical_dir("target", target)?,
            None => source
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| ConfigError::NoDefaultTarget(source.clone()))?,
        };

        if packages.is_empty() {
            return Err(ConfigError::NoPackages);
        }
        if let Some(bad) = packages.iter().find(|p| !is_package_name(p)) {
            return Err(ConfigError::InvalidPackage(bad.clone()));
        }

        Ok(Self {
            source,
            target,
            packages: packages.to_vec(),
            dry_run,
        })
    }
}

/// Canonicalize `path` and require it to be a directory.
fn canonical_dir(what: &'static str, path: &Path) -> Result<PathBuf, ConfigError> {
    let resolved = dunce::canonicalize(path).map_err(|_| ConfigError::MissingDirectory {
        what,
        path: path.to_path_buf(),
    })?;
    if resolved.is_dir() {
        Ok(resolved)
    } else {
        Err(ConfigError::NotADirectory {
            what,
            path: resolved,
        })
    }
}

/// A package name is exactly one plain path component.
fn is_package_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == name
    )
}
