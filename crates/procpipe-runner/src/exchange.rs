//! Piped I/O exchange with a running child.
//!
//! The stdin payload is written on a scoped thread while the calling thread
//! drains stdout, so a child that fills its stdout pipe before consuming all
//! of its input never deadlocks against us. Both ends are taken by value and
//! dropped as soon as their side finishes: dropping the stdin writer is the
//! child's EOF signal, and dropping the stdout reader on a read failure
//! unblocks a child stuck writing to us.

use std::io::{self, Read, Write};
use std::thread;
use tracing::trace;

use crate::error::RunnerError;
use crate::types::BufferConfig;

/// Write `payload` to `stdin` and read `stdout` to EOF concurrently.
///
/// Returns the exact bytes the child wrote. When both sides fail, the stdin
/// failure is reported since it happened in the earlier phase.
pub(crate) fn exchange<W, R>(
    program: &str,
    stdin: W,
    stdout: R,
    payload: &[u8],
    config: BufferConfig,
) -> Result<Vec<u8>, RunnerError>
where
    W: Write + Send,
    R: Read,
{
    if payload.is_empty() {
        drop(stdin);
        return read_to_eof(program, stdout, config);
    }

    thread::scope(|scope| {
        let writer = scope.spawn(move || write_payload(program, stdin, payload));
        let output = read_to_eof(program, stdout, config);

        let written = writer.join().unwrap_or_else(|_| {
            Err(RunnerError::StdinWriteFailed {
                program: program.to_string(),
                written: 0,
                total: payload.len(),
                source: io::Error::other("stdin writer thread panicked"),
            })
        });

        written?;
        output
    })
}

/// Write the whole payload, retrying partial writes and interrupts, then
/// close the pipe.
pub(crate) fn write_payload<W: Write>(
    program: &str,
    mut stdin: W,
    payload: &[u8],
) -> Result<(), RunnerError> {
    let failed = |written: usize, source: io::Error| RunnerError::StdinWriteFailed {
        program: program.to_string(),
        written,
        total: payload.len(),
        source,
    };

    let mut written = 0;
    while written < payload.len() {
        match stdin.write(&payload[written..]) {
            Ok(0) => return Err(failed(written, io::ErrorKind::WriteZero.into())),
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(failed(written, e)),
        }
    }

    loop {
        match stdin.flush() {
            Ok(()) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(failed(written, e)),
        }
    }

    drop(stdin);
    trace!(program, bytes = written, "stdin closed");
    Ok(())
}

/// Read until a zero-byte read, doubling the buffer whenever its headroom
/// falls below the configured threshold.
pub(crate) fn read_to_eof<R: Read>(
    program: &str,
    mut stdout: R,
    config: BufferConfig,
) -> Result<Vec<u8>, RunnerError> {
    let initial = config.initial_bytes.max(1);
    // Fields are public, so re-apply the bounds `BufferConfig::new` enforces.
    let threshold = config.growth_threshold_bytes.clamp(1, initial);
    let mut buffer = vec![0u8; initial];
    let mut total = 0usize;

    loop {
        while buffer.len() - total < threshold {
            let grown = buffer.len() * 2;
            trace!(program, from = buffer.len(), to = grown, "growing stdout buffer");
            buffer.resize(grown, 0);
        }

        match stdout.read(&mut buffer[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                ) => {}
            Err(e) => {
                return Err(RunnerError::StdoutReadFailed {
                    program: program.to_string(),
                    read: total,
                    source: e,
                });
            }
        }
    }

    buffer.truncate(total);
    Ok(buffer)
}

/// Decode stdout as UTF-8, rejecting invalid sequences.
pub(crate) fn decode(program: &str, bytes: Vec<u8>) -> Result<String, RunnerError> {
    String::from_utf8(bytes).map_err(|source| RunnerError::OutputDecodeFailed {
        program: program.to_string(),
        valid_up_to: source.utf8_error().valid_up_to(),
        source,
    })
}
