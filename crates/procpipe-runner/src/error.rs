//! Error types for runner module

use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

use crate::types::Phase;

/// Which standard stream a pipe belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdin,
    Stdout,
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdin => f.write_str("stdin"),
            Self::Stdout => f.write_str("stdout"),
        }
    }
}

/// Failure of a single invocation, tagged by the phase that failed.
///
/// Every variant aborts the invocation. Resources opened before the failure
/// have already been released by the time the caller sees the error.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("invalid argument for '{program}': {reason}")]
    InvalidArgument { program: String, reason: String },

    #[error("failed to create {stream} pipe: {source}")]
    PipeCreationFailed {
        stream: Stream,
        #[source]
        source: io::Error,
    },

    #[error("failed to configure {stream} pipe handle: {source}")]
    HandleConfigurationFailed {
        stream: Stream,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write stdin of '{program}' ({written} of {total} bytes written): {source}")]
    StdinWriteFailed {
        program: String,
        written: usize,
        total: usize,
        #[source]
        source: io::Error,
    },

    #[error("failed to read stdout of '{program}' after {read} bytes: {source}")]
    StdoutReadFailed {
        program: String,
        read: usize,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for '{program}': {source}")]
    WaitFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("exit status of '{program}' unavailable: {reason}")]
    ExitStatusUnavailable { program: String, reason: String },

    #[error("stdout of '{program}' is not valid UTF-8 (valid up to byte {valid_up_to}): {source}")]
    OutputDecodeFailed {
        program: String,
        valid_up_to: usize,
        #[source]
        source: FromUtf8Error,
    },
}

impl RunnerError {
    /// Phase of the invocation that produced this error.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::InvalidArgument { .. } => Phase::Quoting,
            Self::PipeCreationFailed { .. }
            | Self::HandleConfigurationFailed { .. }
            | Self::SpawnFailed { .. } => Phase::Launch,
            Self::StdinWriteFailed { .. } => Phase::Write,
            Self::StdoutReadFailed { .. } => Phase::Read,
            Self::WaitFailed { .. } | Self::ExitStatusUnavailable { .. } => Phase::Wait,
            Self::OutputDecodeFailed { .. } => Phase::Decode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_mapping() {
        let spawn = RunnerError::SpawnFailed {
            program: "git".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(spawn.phase(), Phase::Launch);

        let pipe = RunnerError::PipeCreationFailed {
            stream: Stream::Stdout,
            source: io::Error::from(io::ErrorKind::Other),
        };
        assert_eq!(pipe.phase(), Phase::Launch);

        let status = RunnerError::ExitStatusUnavailable {
            program: "git".to_string(),
            reason: "terminated by signal 9".to_string(),
        };
        assert_eq!(status.phase(), Phase::Wait);

        let invalid = RunnerError::InvalidArgument {
            program: "git".to_string(),
            reason: "argument 0 contains a NUL byte".to_string(),
        };
        assert_eq!(invalid.phase(), Phase::Quoting);
    }

    #[test]
    fn test_display_names_program_and_progress() {
        let err = RunnerError::StdinWriteFailed {
            program: "git".to_string(),
            written: 10,
            total: 20,
            source: io::Error::from(io::ErrorKind::BrokenPipe),
        };
        let message = err.to_string();
        assert!(message.contains("'git'"));
        assert!(message.contains("10 of 20"));
    }

    #[test]
    fn test_decode_error_keeps_source() {
        let source = String::from_utf8(vec![b'o', b'k', 0xff]).unwrap_err();
        let err = RunnerError::OutputDecodeFailed {
            program: "git".to_string(),
            valid_up_to: source.utf8_error().valid_up_to(),
            source,
        };
        assert!(err.to_string().contains("valid up to byte 2"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.phase(), Phase::Decode);
    }
}
