//! `linkfarm` command-line entry point.
use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use linkfarm::cli::Cli;
use linkfarm::error::LinkfarmError;
use linkfarm::{commands, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Cli::command(), "linkfarm", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    if let Err(e) = logging::init_subscriber(args.log.filter(), args.log_file.as_deref()) {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("linkfarm: cannot open log file: {e}");
        }
        return ExitCode::from(2);
    }
    let log = logging::Logger::new(args.log_file.clone());

    match commands::install::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&e.to_string());
            exit_code(&e)
        }
    }
}

/// Usage errors exit with 2, everything else with 1.
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<LinkfarmError>() {
        Some(LinkfarmError::Config(_)) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}
