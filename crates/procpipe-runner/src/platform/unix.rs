use std::fs::File;
use std::io;
use std::os::fd::OwnedFd;
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, Command, ExitStatus, Stdio};

use nix::sys::signal::Signal;
use tracing::debug;

use super::Spawned;
use crate::CommandSpec;
use crate::error::{RunnerError, Stream};

/// Create a pipe whose ends are both close-on-exec.
///
/// The child's ends lose `FD_CLOEXEC` when they are `dup2`ed onto fd 0/1 in
/// the child; the parent's ends never leak into any child.
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
fn pipe(stream: Stream) -> Result<(OwnedFd, OwnedFd), RunnerError> {
    use nix::fcntl::OFlag;

    nix::unistd::pipe2(OFlag::O_CLOEXEC).map_err(|errno| RunnerError::PipeCreationFailed {
        stream,
        source: io::Error::from(errno),
    })
}

/// Apple targets lack `pipe2`; set `FD_CLOEXEC` after the fact.
#[cfg(any(target_os = "macos", target_os = "ios"))]
fn pipe(stream: Stream) -> Result<(OwnedFd, OwnedFd), RunnerError> {
    use nix::fcntl::{FcntlArg, FdFlag, fcntl};

    let (read, write) =
        nix::unistd::pipe().map_err(|errno| RunnerError::PipeCreationFailed {
            stream,
            source: io::Error::from(errno),
        })?;

    for end in [&read, &write] {
        fcntl(end, FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC)).map_err(|errno| {
            RunnerError::HandleConfigurationFailed {
                stream,
                source: io::Error::from(errno),
            }
        })?;
    }

    Ok((read, write))
}

/// Spawn `cmd` with piped stdin/stdout and inherited stderr.
///
/// The argument vector is passed verbatim; the program is resolved on `PATH`
/// unless it contains a `/`.
pub(crate) fn spawn(cmd: &CommandSpec) -> Result<Spawned, RunnerError> {
    let (stdin_read, stdin_write) = pipe(Stream::Stdin)?;
    let (stdout_read, stdout_write) = pipe(Stream::Stdout)?;

    let mut command = Command::new(&cmd.program);
    command
        .args(&cmd.args)
        .stdin(Stdio::from(stdin_read))
        .stdout(Stdio::from(stdout_write))
        .stderr(Stdio::inherit());

    let spawned = command.spawn();
    // `command` owns the child's pipe ends; close them before we touch ours.
    drop(command);

    let child = spawned.map_err(|source| RunnerError::SpawnFailed {
        program: cmd.program.clone(),
        source,
    })?;

    debug!(program = %cmd.program, pid = child.id(), "spawned child");

    Ok(Spawned {
        stdin: File::from(stdin_write),
        stdout: File::from(stdout_read),
        child: ChildHandle {
            program: cmd.program.clone(),
            child,
        },
    })
}

/// Owned handle to a spawned child. Waiting consumes it.
#[derive(Debug)]
pub(crate) struct ChildHandle {
    program: String,
    child: Child,
}

impl ChildHandle {
    /// Block until the child exits and return its exit code.
    pub(crate) fn wait(mut self) -> Result<i32, RunnerError> {
        let status = self.child.wait().map_err(|source| RunnerError::WaitFailed {
            program: self.program.clone(),
            source,
        })?;

        status
            .code()
            .ok_or_else(|| RunnerError::ExitStatusUnavailable {
                reason: describe_abnormal_exit(status),
                program: self.program,
            })
    }
}

fn describe_abnormal_exit(status: ExitStatus) -> String {
    match status.signal() {
        Some(raw) => {
            let name = Signal::try_from(raw).map_or("unknown signal", Signal::as_str);
            if status.core_dumped() {
                format!("terminated by signal {raw} ({name}), core dumped")
            } else {
                format!("terminated by signal {raw} ({name})")
            }
        }
        None => format!("no exit code in status {status}"),
    }
}
