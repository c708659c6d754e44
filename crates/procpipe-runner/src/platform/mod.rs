//! Platform process-creation primitives.
//!
//! Exactly one implementation is compiled per target:
//! - Unix: `pipe2(O_CLOEXEC)` pipes and an argument vector passed verbatim
//! - Windows: `CreatePipe` + `CreateProcessW` with a flattened, quoted
//!   command line
//!
//! Both expose `spawn(&CommandSpec) -> Spawned` and `ChildHandle::wait`.

use std::fs::File;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub(crate) use unix::{ChildHandle, spawn};

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub(crate) use self::windows::{ChildHandle, spawn};

/// A freshly spawned child and the parent's ends of its pipes.
///
/// The child's ends are already closed in the parent when this is returned.
pub(crate) struct Spawned {
    /// Write end of the child's stdin pipe
    pub stdin: File,
    /// Read end of the child's stdout pipe
    pub stdout: File,
    /// Owned process handle, consumed by [`ChildHandle::wait`]
    pub child: ChildHandle,
}
