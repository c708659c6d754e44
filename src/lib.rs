//! procpipe - run a program with piped stdin and stdout
//!
//! This crate is the command-line front end over [`procpipe_runner`]: it
//! discovers configuration, installs logging and maps runner failures to
//! stable exit codes.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! procpipe run --stdin "hello" cat
//! procpipe quote "C:/Program Files/Git/bin/git.exe" log "--format=%H %s"
//! procpipe config
//! ```
//!
//! # Quick Start (Library)
//!
//! Embedders normally depend on `procpipe-runner` directly; the runner types
//! are re-exported here for convenience.
//!
//! ```rust,no_run
//! use procpipe::{CommandSpec, NativeRunner, ProcessRunner};
//!
//! let output = NativeRunner::new()
//!     .run(&CommandSpec::new("git").args(["hash-object", "--stdin"]).stdin("blob"))
//!     .unwrap();
//! assert_eq!(output.exit_code, 0);
//! ```

pub mod cli;
pub mod error;
pub mod exit_codes;
pub mod logging;

pub use error::CliError;
pub use exit_codes::ExitCode;
pub use procpipe_config::{CliArgs, Config, ConfigSource};
pub use procpipe_runner::{
    BufferConfig, CommandSpec, NativeRunner, Phase, ProcessOutput, ProcessRunner, RunnerError,
    run_command,
};
