//! CLI command implementations

use std::io::Write;

use procpipe_config::{Config, ConfigSource};
use procpipe_runner::{CommandSpec, NativeRunner, ProcessRunner, quote};
use tracing::{debug, info};

use super::args::RunArgs;
use crate::error::CliError;
use crate::exit_codes::ExitCode;

// ============================================================================
// Run Command
// ============================================================================

/// Execute `procpipe run`: launch the program, forward its stdout and pass
/// its exit code through.
pub fn execute_run(args: &RunArgs, config: &Config) -> Result<ExitCode, CliError> {
    let stdin = read_stdin_payload(args)?;
    let cmd = CommandSpec::new(&args.program)
        .args(args.args.iter().cloned())
        .stdin(stdin);

    let buffer_config = config.buffer_config();
    debug!(
        initial_buffer_bytes = buffer_config.initial_bytes,
        growth_threshold_bytes = buffer_config.growth_threshold_bytes,
        source = buffer_source(config),
        "runner buffer configuration"
    );
    let runner = NativeRunner::with_buffer_config(buffer_config);
    let output = runner.run(&cmd)?;

    info!(
        program = %cmd.program,
        args = ?cmd.args,
        exit_code = output.exit_code,
        "'{}' exit code: {}",
        cmd.program,
        output.exit_code
    );

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.stdout.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(CliError::Output)?;

    Ok(ExitCode::from_child(output.exit_code))
}

fn buffer_source(config: &Config) -> &'static str {
    config
        .source_attribution
        .get("initial_buffer_bytes")
        .map_or(ConfigSource::Default.label(), ConfigSource::label)
}

fn read_stdin_payload(args: &RunArgs) -> Result<String, CliError> {
    if let Some(text) = &args.stdin {
        return Ok(text.clone());
    }
    match &args.stdin_file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::StdinFile {
            path: path.clone(),
            source,
        }),
        None => Ok(String::new()),
    }
}

// ============================================================================
// Quote Command
// ============================================================================

/// Execute `procpipe quote`: print the flattened command line.
pub fn execute_quote(program: &str, args: &[String]) -> Result<ExitCode, CliError> {
    let cmd = CommandSpec::new(program).args(args.iter().cloned());
    println!("{}", quote::command_line(&cmd));
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Config Command
// ============================================================================

/// Render the effective configuration, one `key = value  (source)` per line.
pub fn render_config(config: &Config) -> String {
    let mut out = String::new();
    match &config.config_path {
        Some(path) => out.push_str(&format!("# config file: {}\n", path.display())),
        None => out.push_str("# config file: none\n"),
    }

    let effective = config.effective_config();
    let mut keys: Vec<_> = effective.keys().collect();
    keys.sort();
    for key in keys {
        let (value, source) = &effective[key];
        out.push_str(&format!("{key} = {value}  ({source})\n"));
    }
    out
}

/// Execute `procpipe config`.
pub fn execute_config(config: &Config) -> Result<ExitCode, CliError> {
    print!("{}", render_config(config));
    Ok(ExitCode::SUCCESS)
}
