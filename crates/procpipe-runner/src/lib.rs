//! Synchronous subprocess execution with piped stdin and stdout.
//!
//! Given a program, an argument list and a block of stdin text, the runner
//! launches the program, delivers the input, collects all of its stdout as
//! UTF-8 text, waits for it to exit and reports the exit code. Stderr is
//! inherited from the parent.
//!
//! # Platforms
//!
//! - Unix: arguments reach the child as a vector, verbatim.
//! - Windows: arguments are quoted into one command line for `CreateProcessW`
//!   (see [`quote`]).
//!
//! # Errors
//!
//! Every failure is a [`RunnerError`] tagged with the [`Phase`] it came from.
//! A failed invocation never looks like a successful one with empty output.

pub mod command_spec;
pub mod error;
mod exchange;
mod platform;
pub mod process;
pub mod quote;
pub mod types;

pub use command_spec::CommandSpec;
pub use error::{RunnerError, Stream};
pub use process::{NativeRunner, ProcessOutput, ProcessRunner, run_command};
pub use types::{BufferConfig, Phase};
