//! End-to-end runner tests against the `procpipe-stub` fixture child
//!
//! The stub is a real process, so these tests exercise pipe creation,
//! launching, the concurrent stdin/stdout exchange and reaping together.

use procpipe::{BufferConfig, CommandSpec, NativeRunner, Phase, ProcessRunner, RunnerError};
use proptest::prelude::*;

const STUB: &str = env!("CARGO_BIN_EXE_procpipe-stub");
const MIB: usize = 1024 * 1024;

fn stub(args: &[&str]) -> CommandSpec {
    CommandSpec::new(STUB).args(args.iter().copied())
}

fn payload(len: usize) -> String {
    let alphabet = b"abcdefghijklmnopqrstuvwxyz0123456789\n";
    (0..len)
        .map(|i| char::from(alphabet[i % alphabet.len()]))
        .collect()
}

#[test]
fn test_echo_round_trip_across_sizes() {
    let runner = NativeRunner::new();
    for len in [0, 1, 4095, 65_537, 4 * MIB] {
        let input = payload(len);
        let output = runner.run(&stub(&["echo"]).stdin(input.as_str())).unwrap();
        assert_eq!(output.exit_code, 0, "len={len}");
        assert_eq!(output.stdout.len(), len);
        assert!(output.stdout == input, "echo mismatch at len={len}");
    }
}

#[test]
fn test_echo_preserves_multibyte_text() {
    let input = "héllo wörld ✓ 日本語\n".repeat(10_000);
    let output = NativeRunner::new()
        .run(&stub(&["echo"]).stdin(input.as_str()))
        .unwrap();
    assert_eq!(output.stdout, input);
}

#[test]
fn test_tiny_buffer_grows_to_fit_output() {
    let runner = NativeRunner::with_buffer_config(BufferConfig::new(16, 4));
    let input = payload(MIB + 3);
    let output = runner.run(&stub(&["echo"]).stdin(input.as_str())).unwrap();
    assert!(output.stdout == input);
}

#[test]
fn test_child_that_floods_stdout_before_reading_does_not_deadlock() {
    let input = payload(4 * MIB);
    let output = NativeRunner::new()
        .run(&stub(&["flood-then-read", "4194304"]).stdin(input.as_str()))
        .unwrap();
    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.starts_with(&"y".repeat(4096)));
    assert!(output.stdout.ends_with("\nread=4194304\n"));
    assert_eq!(output.stdout.len(), 4 * MIB + "\nread=4194304\n".len());
}

#[test]
fn test_child_that_reads_all_stdin_before_writing_does_not_deadlock() {
    let input = payload(4 * MIB);
    let output = NativeRunner::new()
        .run(&stub(&["slurp-then-emit", "4194304"]).stdin(input.as_str()))
        .unwrap();
    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.ends_with("\nread=4194304\n"));
    assert_eq!(output.stdout.len(), 4 * MIB + "\nread=4194304\n".len());
}

#[test]
fn test_empty_stdin_is_closed_immediately() {
    let output = NativeRunner::new()
        .run(&stub(&["slurp-then-emit", "3"]))
        .unwrap();
    assert_eq!(output.stdout, "xxx\nread=0\n");
}

#[test]
fn test_non_zero_exit_code_is_reported() {
    let output = NativeRunner::new().run(&stub(&["exit", "7"])).unwrap();
    assert_eq!(output.exit_code, 7);
    assert_eq!(output.stdout, "");
    assert!(!output.success());

    let output = NativeRunner::new()
        .run(&stub(&["exit", "7", "--print", "partial output"]))
        .unwrap();
    assert_eq!(output.exit_code, 7);
    assert_eq!(output.stdout, "partial output");
}

#[test]
fn test_stderr_is_not_captured() {
    let output = NativeRunner::new()
        .run(&stub(&["stderr", "diagnostic text"]))
        .unwrap();
    assert_eq!(output.stdout, "out");
}

#[test]
fn test_invalid_utf8_output_is_decode_failure() {
    let err = NativeRunner::new().run(&stub(&["invalid-utf8"])).unwrap_err();
    assert_eq!(err.phase(), Phase::Decode);
    match err {
        RunnerError::OutputDecodeFailed { valid_up_to, .. } => assert_eq!(valid_up_to, 2),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_child_exiting_without_reading_stdin_is_write_failure() {
    // Far larger than any pipe buffer, so the writer is still mid-payload when
    // the child exits and the read end goes away.
    let input = "z".repeat(8 * MIB);
    let err = NativeRunner::new()
        .run(&stub(&["exit", "0"]).stdin(input.as_str()))
        .unwrap_err();
    assert_eq!(err.phase(), Phase::Write);
    match err {
        RunnerError::StdinWriteFailed { written, total, .. } => {
            assert_eq!(total, 8 * MIB);
            assert!(written < total, "written={written}");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // The runner stays usable afterwards.
    let output = NativeRunner::new()
        .run(&stub(&["echo"]).stdin("after"))
        .unwrap();
    assert_eq!(output.stdout, "after");
}

#[test]
fn test_nonexistent_program_is_spawn_failure() {
    let cmd = CommandSpec::new("procpipe-definitely-missing-program").stdin("ignored");
    let err = NativeRunner::new().run(&cmd).unwrap_err();
    assert!(matches!(err, RunnerError::SpawnFailed { .. }), "{err:?}");
    assert_eq!(err.phase(), Phase::Launch);
}

#[test]
fn test_arguments_reach_the_child_intact() {
    let args = ["plain", "a b", "x&y", "semi;colon", "--flag=value", "(paren)"];
    let mut cmd = stub(&["args"]);
    cmd = cmd.args(args);
    let output = NativeRunner::new().run(&cmd).unwrap();
    let lines: Vec<&str> = output.stdout.lines().collect();
    assert_eq!(lines, args);
}

#[cfg(unix)]
#[test]
fn test_unix_arguments_are_passed_verbatim() {
    let args = ["first", "", "$HOME", "*", "\"quoted\"", "back\\slash"];
    let output = NativeRunner::new()
        .run(&stub(&["args"]).args(args))
        .unwrap();
    assert_eq!(output.stdout, "first\n\n$HOME\n*\n\"quoted\"\nback\\slash\n");
}

#[test]
fn test_concurrent_invocations_are_independent() {
    let runner = NativeRunner::new();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let runner = &runner;
                scope.spawn(move || {
                    let input = format!("worker-{i}\n").repeat(20_000);
                    let output = runner.run(&stub(&["echo"]).stdin(input.as_str())).unwrap();
                    assert_eq!(output.exit_code, 0);
                    assert!(output.stdout == input, "worker {i} got foreign output");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    });
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: echo returns exactly the text it was given, whatever the
    /// buffer sizing.
    #[test]
    fn prop_echo_returns_input(
        input in "\\PC{0,2048}",
        initial in 1usize..512,
        threshold in 1usize..64,
    ) {
        let runner = NativeRunner::with_buffer_config(BufferConfig::new(initial, threshold));
        let output = runner.run(&stub(&["echo"]).stdin(input.as_str())).unwrap();
        prop_assert_eq!(output.exit_code, 0);
        prop_assert_eq!(output.stdout, input);
    }
}
