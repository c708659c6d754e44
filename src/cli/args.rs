//! CLI argument definitions and parsing structures

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// procpipe - run a program with piped stdin/stdout
#[derive(Parser, Debug)]
#[command(name = "procpipe")]
#[command(about = "Run a program, feed it stdin, collect its stdout and exit code")]
#[command(long_about = r#"
procpipe launches a program with a piped stdin and stdout, writes the given
input, collects everything the program prints and exits with its exit code.
Stderr is passed through untouched.

EXAMPLES:
  # Feed text to a filter
  procpipe run --stdin "b\na\n" sort

  # Feed a file, with a larger initial output buffer
  procpipe run --stdin-file blob.bin --initial-buffer 1048576 git hash-object --stdin

  # Show the Windows command line that would be built
  procpipe quote git log "--format=%H %s"

  # Show the effective configuration and where each value came from
  procpipe config

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .procpipe/config.toml
  Use --config to specify an explicit config file path
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a program and exit with its exit code
    Run(RunArgs),

    /// Print the flattened Windows command line for a program and arguments
    Quote {
        /// Program to launch
        program: String,

        /// Arguments, passed verbatim
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the effective configuration with source attribution
    Config,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Text written to the program's stdin
    #[arg(long, conflicts_with = "stdin_file")]
    pub stdin: Option<String>,

    /// File whose contents (UTF-8) are written to the program's stdin
    #[arg(long, value_name = "PATH")]
    pub stdin_file: Option<PathBuf>,

    /// Initial stdout buffer size in bytes
    #[arg(long, value_name = "BYTES")]
    pub initial_buffer: Option<usize>,

    /// Program to launch
    pub program: String,

    /// Arguments, passed verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
