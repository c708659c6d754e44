use tracing::debug;

use crate::error::RunnerError;
use crate::exchange;
use crate::platform::{self, Spawned};
use crate::types::BufferConfig;

use super::CommandSpec;

// ============================================================================
// ProcessRunner Trait - Synchronous Invocation Interface
// ============================================================================

/// Result of a completed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Everything the child wrote to stdout, decoded as UTF-8
    pub stdout: String,
    /// Exit code reported by the child
    pub exit_code: i32,
}

impl ProcessOutput {
    /// Create a new `ProcessOutput` with the given values.
    #[must_use]
    pub fn new(stdout: String, exit_code: i32) -> Self {
        Self { stdout, exit_code }
    }

    /// Check if the process exited successfully (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait for synchronous process execution.
///
/// One call runs one child to completion: spawn, feed stdin, drain stdout,
/// reap. The calling thread is blocked for the whole invocation; there is no
/// timeout and no cancellation.
///
/// # Threading
///
/// Implementations keep no state between invocations, so a runner may be
/// shared across threads and used concurrently.
///
/// # Example
///
/// ```rust
/// use procpipe_runner::{CommandSpec, ProcessOutput, ProcessRunner, RunnerError};
///
/// struct CannedRunner;
///
/// impl ProcessRunner for CannedRunner {
///     fn run(&self, _cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
///         Ok(ProcessOutput::new("canned\n".to_string(), 0))
///     }
/// }
///
/// let output = CannedRunner.run(&CommandSpec::new("git").arg("status")).unwrap();
/// assert!(output.success());
/// ```
pub trait ProcessRunner {
    /// Execute `cmd` and wait for it to finish.
    ///
    /// # Returns
    ///
    /// * `Ok(ProcessOutput)` - The process completed (possibly with non-zero exit code)
    /// * `Err(RunnerError)` - A phase failed; [`RunnerError::phase`] says which
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError>;
}

// ============================================================================
// NativeRunner - Platform Process Execution
// ============================================================================

/// Runs commands with the platform's native process-creation primitive.
///
/// # Example
///
/// ```rust,no_run
/// use procpipe_runner::{CommandSpec, NativeRunner, ProcessRunner};
///
/// let runner = NativeRunner::new();
/// let cmd = CommandSpec::new("git").args(["hash-object", "--stdin"]).stdin("blob");
/// let output = runner.run(&cmd).unwrap();
/// println!("{} (exit {})", output.stdout.trim(), output.exit_code);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner {
    /// Stdout buffering configuration
    pub buffer_config: BufferConfig,
}

impl NativeRunner {
    /// Create a `NativeRunner` with the default buffer configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `NativeRunner` with custom buffer configuration.
    #[must_use]
    pub const fn with_buffer_config(buffer_config: BufferConfig) -> Self {
        Self { buffer_config }
    }
}

impl ProcessRunner for NativeRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
        cmd.check_nul()?;

        debug!(
            program = %cmd.program,
            args = ?cmd.args,
            stdin_bytes = cmd.stdin.len(),
            "launching process"
        );

        let Spawned {
            stdin,
            stdout,
            child,
        } = platform::spawn(cmd)?;

        let bytes = match exchange::exchange(
            &cmd.program,
            stdin,
            stdout,
            cmd.stdin.as_bytes(),
            self.buffer_config,
        ) {
            Ok(bytes) => bytes,
            Err(err) => {
                // Both pipe ends are closed by now, so the child sees EOF or a
                // broken pipe and exits; reap it before reporting.
                if let Err(wait_err) = child.wait() {
                    debug!(program = %cmd.program, error = %wait_err, "reap after I/O failure failed");
                }
                return Err(err);
            }
        };

        let exit_code = child.wait()?;
        debug!(
            program = %cmd.program,
            exit_code,
            stdout_bytes = bytes.len(),
            "process exited"
        );

        let stdout = exchange::decode(&cmd.program, bytes)?;
        Ok(ProcessOutput::new(stdout, exit_code))
    }
}

/// Run `program` with `args`, feed it `stdin`, and collect its stdout.
///
/// Convenience wrapper over [`NativeRunner`] with default buffering.
///
/// ```rust,no_run
/// let output = procpipe_runner::run_command("git", &["status", "--porcelain"], "").unwrap();
/// assert_eq!(output.exit_code, 0);
/// ```
pub fn run_command<S: AsRef<str>>(
    program: &str,
    args: &[S],
    stdin: &str,
) -> Result<ProcessOutput, RunnerError> {
    let cmd = CommandSpec::new(program)
        .args(args.iter().map(|a| a.as_ref().to_string()))
        .stdin(stdin);
    NativeRunner::new().run(&cmd)
}
