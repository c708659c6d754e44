//! Errors surfaced by the `procpipe` command line

use std::io;
use std::path::PathBuf;

use procpipe_runner::RunnerError;
use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Failure of a CLI command.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration discovery, parsing or validation failed
    #[error(transparent)]
    Config(#[from] anyhow::Error),

    #[error("failed to read stdin file {}: {source}", path.display())]
    StdinFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Runner(#[from] RunnerError),

    /// Forwarding the child's stdout to our own stdout failed
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl CliError {
    /// Short label printed as `error[<label>]: ...`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::StdinFile { .. } => "input",
            Self::Runner(err) => err.phase().as_str(),
            Self::Output(_) => "output",
        }
    }

    /// Process exit code for this failure.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) | Self::StdinFile { .. } => ExitCode::CLI_ARGS,
            Self::Runner(err) => ExitCode::from(err),
            Self::Output(_) => ExitCode::IO_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_errors_use_phase_label() {
        let err = CliError::from(RunnerError::InvalidArgument {
            program: "git".to_string(),
            reason: "argument 1 contains an interior NUL byte".to_string(),
        });
        assert_eq!(err.label(), "quoting");
        assert_eq!(err.exit_code(), ExitCode::LAUNCH_FAILURE);
        assert!(err.to_string().starts_with("invalid argument for 'git'"));
    }

    #[test]
    fn test_stdin_file_error() {
        let err = CliError::StdinFile {
            path: PathBuf::from("missing.txt"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.label(), "input");
        assert_eq!(err.exit_code(), ExitCode::CLI_ARGS);
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_config_error() {
        let err = CliError::from(anyhow::anyhow!("bad toml"));
        assert_eq!(err.label(), "config");
        assert_eq!(err.exit_code(), ExitCode::CLI_ARGS);
        assert_eq!(err.to_string(), "bad toml");
    }
}
