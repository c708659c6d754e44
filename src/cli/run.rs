//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, discovers configuration, installs logging and
//! dispatches to the command handlers. It owns all error output; `main`
//! only turns the returned code into a process exit.

use clap::Parser;
use tracing::debug;

use procpipe_config::{CliArgs, Config};

use super::args::{Cli, Commands};
use super::commands;
use crate::error::CliError;
use crate::exit_codes::ExitCode;
use crate::logging;

/// Main CLI execution function.
///
/// Returns `Ok(code)` with the code to exit with (the child's own exit code
/// for `run`), or `Err(code)` after printing an `error[<label>]: ...` line.
pub fn run() -> Result<ExitCode, ExitCode> {
    let cli = Cli::parse();

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        initial_buffer_bytes: match &cli.command {
            Commands::Run(args) => args.initial_buffer,
            _ => None,
        },
        verbose: cli.verbose.then_some(true),
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => return Err(report(&CliError::Config(err))),
    };

    if let Err(err) = logging::init_tracing(config.verbose()) {
        eprintln!("warning: failed to initialize logging: {err}");
    }
    if let Some(path) = &config.config_path {
        debug!(path = %path.display(), "loaded config file");
    }

    let result = match cli.command {
        Commands::Run(args) => commands::execute_run(&args, &config),
        Commands::Quote { program, args } => commands::execute_quote(&program, &args),
        Commands::Config => commands::execute_config(&config),
    };

    result.map_err(|err| report(&err))
}

fn report(err: &CliError) -> ExitCode {
    eprintln!("error[{}]: {err:#}", err.label());
    err.exit_code()
}
