//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Top-level CLI entry point for the link farm manager.
#[derive(Parser, Debug)]
#[command(
    name = "linkfarm",
    about = "Install packages of a source directory into a target as a farm of symlinks",
    version = crate::commands::version()
)]
pub struct Cli {
    /// Source directory holding the packages (must contain a `.linkfarm` entry)
    /// [default: current directory]
    #[arg(short, long, env = "LINKFARM_SOURCE", value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Target directory to install into [default: parent of the source
    /// directory, wherever `--source` points]
    #[arg(short, long, env = "LINKFARM_TARGET", value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Print the plan instead of applying it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Console log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, value_name = "LEVEL")]
    pub log: LogLevel,

    /// Also write a debug-level log to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print a completion script for the given shell and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,

    /// Packages to install, in order
    #[arg(value_name = "PACKAGES", required_unless_present = "completions")]
    pub packages: Vec<String>,
}

/// Console verbosity.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Print nothing.
    None,
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warn,
    /// Progress and actions.
    #[default]
    Info,
    /// Every planning decision.
    Debug,
}

impl LogLevel {
    /// The matching `tracing` filter.
    #[must_use]
    pub const fn filter(self) -> tracing_subscriber::filter::LevelFilter {
        use tracing_subscriber::filter::LevelFilter;
        match self {
            Self::None => LevelFilter::OFF,
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_packages_in_order() {
        let cli = Cli::parse_from(["linkfarm", "vim", "git", "zsh"]);
        assert_eq!(cli.packages, vec!["vim", "git", "zsh"]);
        assert!(!cli.dry_run);
        assert_eq!(cli.log, LogLevel::Info);
    }

    #[test]
    fn parse_source_and_target() {
        let cli = Cli::parse_from(["linkfarm", "-s", "/dots", "--target", "/home/me", "vim"]);
        assert_eq!(cli.source, Some(PathBuf::from("/dots")));
        assert_eq!(cli.target, Some(PathBuf::from("/home/me")));
    }

    #[test]
    fn parse_dry_run_short() {
        let cli = Cli::parse_from(["linkfarm", "-n", "vim"]);
        assert!(cli.dry_run);
    }

    #[test]
    fn parse_log_level() {
        let cli = Cli::parse_from(["linkfarm", "--log", "debug", "vim"]);
        assert_eq!(cli.log, LogLevel::Debug);
        let cli = Cli::parse_from(["linkfarm", "--log", "none", "vim"]);
        assert_eq!(cli.log.filter(), tracing_subscriber::filter::LevelFilter::OFF);
    }

    #[test]
    fn packages_are_required() {
        assert!(Cli::try_parse_from(["linkfarm"]).is_err());
    }

    #[test]
    fn completions_need_no_packages() {
        let cli = Cli::parse_from(["linkfarm", "--completions", "bash"]);
        assert_eq!(cli.completions, Some(clap_complete::Shell::Bash));
        assert!(cli.packages.is_empty());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["linkfarm", "--log", "loud", "vim"]).is_err());
    }

    #[test]
    fn target_help_names_source_relative_default() {
        let cmd = Cli::command();
        let help = |id: &str| {
            cmd.get_arguments()
                .find(|a| a.get_id() == id)
                .and_then(|a| a.get_long_help().or_else(|| a.get_help()))
                .map(ToString::to_string)
                .unwrap()
        };
        assert!(help("target").contains("parent of the source"));
        assert!(help("source").contains("current directory"));
    }
}
