//! Exit code constants and runner error mapping for procpipe
//!
//! Codes follow the BSD `sysexits.h` conventions where one fits, so scripts
//! driving `procpipe run` can tell a launcher failure from a child that
//! merely exited non-zero.

use procpipe_runner::{Phase, RunnerError};

/// Process exit code returned by the `procpipe` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// CLI arguments error - invalid arguments, unreadable input file or bad config
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Child stdout was not valid UTF-8 (`EX_DATAERR`)
    pub const DECODE_FAILURE: ExitCode = ExitCode(65);

    /// Waiting on the child or reading its status failed (`EX_SOFTWARE`)
    pub const INTERNAL: ExitCode = ExitCode(70);

    /// Quoting, pipe setup or spawn failed (`EX_OSERR`)
    pub const LAUNCH_FAILURE: ExitCode = ExitCode(71);

    /// Writing stdin or reading stdout failed (`EX_IOERR`)
    pub const IO_FAILURE: ExitCode = ExitCode(74);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Pass a child's exit code through as our own.
    ///
    /// Unix only keeps the low 8 bits of a status; Windows keeps all 32.
    #[must_use]
    pub const fn from_child(code: i32) -> Self {
        if cfg!(unix) {
            ExitCode(code & 0xff)
        } else {
            ExitCode(code)
        }
    }

    /// Exit code for a failure in `phase`.
    #[must_use]
    pub const fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Quoting | Phase::Launch => Self::LAUNCH_FAILURE,
            Phase::Write | Phase::Read => Self::IO_FAILURE,
            Phase::Wait => Self::INTERNAL,
            Phase::Decode => Self::DECODE_FAILURE,
        }
    }
}

impl From<&RunnerError> for ExitCode {
    fn from(err: &RunnerError) -> Self {
        Self::for_phase(err.phase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_exit_code_constants() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::CLI_ARGS.as_i32(), 2);
        assert_eq!(ExitCode::DECODE_FAILURE.as_i32(), 65);
        assert_eq!(ExitCode::INTERNAL.as_i32(), 70);
        assert_eq!(ExitCode::LAUNCH_FAILURE.as_i32(), 71);
        assert_eq!(ExitCode::IO_FAILURE.as_i32(), 74);
    }

    #[test]
    fn test_phase_mapping() {
        assert_eq!(ExitCode::for_phase(Phase::Quoting), ExitCode::LAUNCH_FAILURE);
        assert_eq!(ExitCode::for_phase(Phase::Launch), ExitCode::LAUNCH_FAILURE);
        assert_eq!(ExitCode::for_phase(Phase::Write), ExitCode::IO_FAILURE);
        assert_eq!(ExitCode::for_phase(Phase::Read), ExitCode::IO_FAILURE);
        assert_eq!(ExitCode::for_phase(Phase::Wait), ExitCode::INTERNAL);
        assert_eq!(ExitCode::for_phase(Phase::Decode), ExitCode::DECODE_FAILURE);
    }

    #[test]
    fn test_runner_error_conversion() {
        let err = RunnerError::SpawnFailed {
            program: "missing".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(ExitCode::from(&err), ExitCode::LAUNCH_FAILURE);

        let err = RunnerError::StdoutReadFailed {
            program: "cat".to_string(),
            read: 12,
            source: io::Error::from(io::ErrorKind::BrokenPipe),
        };
        assert_eq!(ExitCode::from(&err), ExitCode::IO_FAILURE);
    }

    #[test]
    fn test_child_code_passthrough() {
        assert_eq!(ExitCode::from_child(0), ExitCode::SUCCESS);
        assert_eq!(ExitCode::from_child(7).as_i32(), 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_child_code_truncated_on_unix() {
        assert_eq!(ExitCode::from_child(256 + 3).as_i32(), 3);
    }
}
