//! The install command: plan, then apply or print.
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Result, anyhow};

use crate::cli::Cli;
use crate::config::Options;
use crate::error::LinkfarmError;
use crate::fs::{Filesystem, RealFs};
use crate::logging::Logger;
use crate::plan::{Action, Plan};
use crate::planner::Planner;

/// Run the install command against the real filesystem.
///
/// # Errors
///
/// Returns an error if the options are invalid, planning fails, or an action
/// cannot be applied.
pub fn run(cli: &Cli, log: &Logger) -> Result<()> {
    let fs = RealFs;
    let options = Options::resolve(cli, &fs).map_err(LinkfarmError::from)?;
    let mut stdout = io::stdout().lock();
    execute(&options, &fs, log, &mut stdout)
}

/// Plan the installation described by `options`, then either apply it or,
/// for a dry run, write the plan document to `out`.
///
/// # Errors
///
/// Returns an error if planning fails, an action cannot be applied, or the
/// plan document cannot be written.
pub fn execute(
    options: &Options,
    fs: &dyn Filesystem,
    log: &Logger,
    out: &mut dyn Write,
) -> Result<()> {
    log.info(&format!("linkfarm {}", super::version()));
    log.debug(&format!("source: {}", options.source.display()));
    log.debug(&format!("target: {}", options.target.display()));
    for name in repeated(&options.packages) {
        log.warn(&format!("package {name} is listed more than once"));
    }

    log.stage("Planning");
    let plan = Planner::new(fs, &options.source, &options.target)
        .plan(&options.packages)
        .map_err(LinkfarmError::from)?;
    log.info(&format!(
        "{} package(s): {} task(s), {} action(s)",
        options.packages.len(),
        plan.len(),
        plan.action_count()
    ));

    if options.dry_run {
        for (item, task) in plan.tasks() {
            let path = plan.target().join(item);
            for action in task.actions() {
                log.dry_run(&describe(action, &path));
            }
        }
        let document = plan
            .to_document()
            .map_err(|e| anyhow!("cannot render plan document: {e}"))?;
        writeln!(out, "{document}").map_err(|e| anyhow!("cannot write plan document: {e}"))?;
        return Ok(());
    }

    if plan.is_empty() {
        log.info("nothing to do");
        return Ok(());
    }

    log.stage("Applying");
    plan.execute(fs).map_err(LinkfarmError::from)?;
    log.info(&summary(&plan));
    if let Some(path) = log.log_file() {
        log.info(&format!("log: {}", path.display()));
    }
    Ok(())
}

/// Package names that appear more than once, each reported once.
fn repeated(packages: &[String]) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    let mut repeated = BTreeSet::new();
    for name in packages {
        if !seen.insert(name.as_str()) {
            repeated.insert(name.as_str());
        }
    }
    repeated.into_iter().collect()
}

/// One line per action, as a dry run reports it.
fn describe(action: &Action, path: &Path) -> String {
    match action {
        Action::Mkdir => format!("would mkdir {}", path.display()),
        Action::Remove => format!("would remove {}", path.display()),
        Action::Symlink { dest } => {
            format!("would link {} -> {}", path.display(), dest.display())
        }
    }
}

fn summary(plan: &Plan) -> String {
    format!(
        "{} task(s), {} action(s) applied",
        plan.len(),
        plan.action_count()
    )
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn describe_uses_dry_run_verbs() {
        let path = Path::new("/t/a");
        assert_eq!(describe(&Action::Mkdir, path), "would mkdir /t/a");
        assert_eq!(describe(&Action::Remove, path), "would remove /t/a");
        assert_eq!(
            describe(
                &Action::Symlink {
                    dest: PathBuf::from("../s/p/a")
                },
                path
            ),
            "would link /t/a -> ../s/p/a"
        );
    }

    #[test]
    fn repeated_packages_are_reported_once() {
        let packages: Vec<String> = ["vim", "git", "vim", "zsh", "vim", "git"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(repeated(&packages), ["git", "vim"]);
        assert!(repeated(&packages[..2]).is_empty());
    }
}
