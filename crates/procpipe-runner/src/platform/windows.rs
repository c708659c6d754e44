use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::io::{AsRawHandle, FromRawHandle, OwnedHandle};
use std::sync::{Mutex, PoisonError};

use tracing::debug;
use windows::Win32::Foundation::{
    HANDLE, HANDLE_FLAG_INHERIT, HANDLE_FLAGS, SetHandleInformation, WAIT_OBJECT_0,
};
use windows::Win32::Security::SECURITY_ATTRIBUTES;
use windows::Win32::System::Console::{GetStdHandle, STD_ERROR_HANDLE};
use windows::Win32::System::Pipes::CreatePipe;
use windows::Win32::System::Threading::{
    CREATE_NO_WINDOW, CREATE_UNICODE_ENVIRONMENT, CreateProcessW, GetExitCodeProcess, INFINITE,
    PROCESS_INFORMATION, STARTF_USESTDHANDLES, STARTUPINFOW, WaitForSingleObject,
};
use windows::core::{PCWSTR, PWSTR};

use super::Spawned;
use crate::CommandSpec;
use crate::error::{RunnerError, Stream};
use crate::quote;

/// Serializes the window in which inheritable pipe ends exist.
///
/// `CreateProcessW(bInheritHandles = TRUE)` hands every inheritable handle in
/// the process to the child, so two concurrent launches would otherwise leak
/// each other's pipe ends and neither reader would see EOF.
///
/// The lock only covers launches made through this module. A concurrent
/// `std::process::Command::spawn` elsewhere in the host process takes std's
/// own lock instead and can still inherit these ends; EOF is then delayed
/// until that unrelated child exits or closes them.
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

fn owned(handle: HANDLE) -> OwnedHandle {
    // SAFETY: `handle` was just returned by the OS and is owned by nobody else.
    unsafe { OwnedHandle::from_raw_handle(handle.0) }
}

fn raw(handle: &OwnedHandle) -> HANDLE {
    HANDLE(handle.as_raw_handle())
}

/// Create an inheritable pipe. Returns `(read, write)`.
fn pipe(stream: Stream) -> Result<(OwnedHandle, OwnedHandle), RunnerError> {
    let attributes = SECURITY_ATTRIBUTES {
        nLength: std::mem::size_of::<SECURITY_ATTRIBUTES>() as u32,
        lpSecurityDescriptor: std::ptr::null_mut(),
        bInheritHandle: true.into(),
    };

    let mut read = HANDLE::default();
    let mut write = HANDLE::default();

    // SAFETY: both out-pointers are valid locals and `attributes` outlives the call.
    unsafe { CreatePipe(&mut read, &mut write, Some(&raw const attributes), 0) }.map_err(
        |e| RunnerError::PipeCreationFailed {
            stream,
            source: io::Error::from(e),
        },
    )?;

    Ok((owned(read), owned(write)))
}

/// Clear `HANDLE_FLAG_INHERIT` on a parent-side pipe end.
fn disinherit(handle: &OwnedHandle, stream: Stream) -> Result<(), RunnerError> {
    // SAFETY: `handle` is a live pipe handle owned by this process.
    unsafe { SetHandleInformation(raw(handle), HANDLE_FLAG_INHERIT.0, HANDLE_FLAGS(0)) }.map_err(
        |e| RunnerError::HandleConfigurationFailed {
            stream,
            source: io::Error::from(e),
        },
    )
}

fn to_wide(text: &str) -> Vec<u16> {
    OsStr::new(text)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

/// Spawn `cmd` through `CreateProcessW` with a flattened, quoted command
/// line, piped stdin/stdout and the parent's stderr.
pub(crate) fn spawn(cmd: &CommandSpec) -> Result<Spawned, RunnerError> {
    let command_line = quote::command_line(cmd);
    let mut wide_command_line = to_wide(&command_line);

    let guard = SPAWN_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    let (stdout_read, stdout_write) = pipe(Stream::Stdout)?;
    disinherit(&stdout_read, Stream::Stdout)?;
    let (stdin_read, stdin_write) = pipe(Stream::Stdin)?;
    disinherit(&stdin_write, Stream::Stdin)?;

    let startup_info = STARTUPINFOW {
        cb: std::mem::size_of::<STARTUPINFOW>() as u32,
        dwFlags: STARTF_USESTDHANDLES,
        hStdInput: raw(&stdin_read),
        hStdOutput: raw(&stdout_write),
        // SAFETY: querying the parent's own standard handle.
        hStdError: unsafe { GetStdHandle(STD_ERROR_HANDLE) }.unwrap_or_default(),
        ..Default::default()
    };
    let mut process_info = PROCESS_INFORMATION::default();

    // SAFETY: the command line buffer is NUL-terminated and writable, and
    // every pointer refers to a local that outlives the call.
    let created = unsafe {
        CreateProcessW(
            PCWSTR::null(),
            Some(PWSTR(wide_command_line.as_mut_ptr())),
            None,
            None,
            true,
            CREATE_NO_WINDOW | CREATE_UNICODE_ENVIRONMENT,
            None,
            PCWSTR::null(),
            &raw const startup_info,
            &raw mut process_info,
        )
    };

    // The child holds its own copies now; ours must go before any I/O.
    drop(stdin_read);
    drop(stdout_write);
    drop(guard);

    created.map_err(|e| RunnerError::SpawnFailed {
        program: cmd.program.clone(),
        source: io::Error::from(e),
    })?;

    drop(owned(process_info.hThread));
    let process = owned(process_info.hProcess);

    debug!(
        program = %cmd.program,
        pid = process_info.dwProcessId,
        command_line = %command_line,
        "spawned child"
    );

    Ok(Spawned {
        stdin: File::from(stdin_write),
        stdout: File::from(stdout_read),
        child: ChildHandle {
            program: cmd.program.clone(),
            process,
        },
    })
}

/// Owned process handle. Waiting consumes it; the handle closes on drop.
#[derive(Debug)]
pub(crate) struct ChildHandle {
    program: String,
    process: OwnedHandle,
}

impl ChildHandle {
    /// Block until the child exits and return its exit code.
    ///
    /// The native `u32` code is reinterpreted as `i32`, matching
    /// `std::process::ExitStatus::code` on Windows.
    pub(crate) fn wait(self) -> Result<i32, RunnerError> {
        // SAFETY: `self.process` is a live process handle.
        let event = unsafe { WaitForSingleObject(raw(&self.process), INFINITE) };
        if event != WAIT_OBJECT_0 {
            return Err(RunnerError::WaitFailed {
                program: self.program,
                source: io::Error::last_os_error(),
            });
        }

        let mut exit_code = 0u32;
        // SAFETY: `exit_code` is a valid out-pointer.
        unsafe { GetExitCodeProcess(raw(&self.process), &mut exit_code) }.map_err(|e| {
            RunnerError::ExitStatusUnavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(exit_code as i32)
    }
}
