//! Flattened command-line construction for `CreateProcessW`.
//!
//! Windows hands the child a single command-line string that the child's
//! runtime re-splits. Arguments containing a space or shell-meaningful
//! punctuation are wrapped in double quotes. Embedded quotes are left as-is;
//! this is a plain wrapper, not a full `CommandLineToArgvW` escaper.
//!
//! The functions are pure so they are built on every platform; only the
//! Windows launcher uses them when spawning.

use crate::CommandSpec;

/// Characters that force an argument to be quoted.
pub const QUOTE_TRIGGERS: &[char] = &[
    ' ', '&', '(', ')', '[', ']', '{', '}', '^', '=', ';', '!', '\'', '+', ',', '`', '~',
];

/// Returns true if `arg` contains a character from [`QUOTE_TRIGGERS`].
#[must_use]
pub fn needs_quoting(arg: &str) -> bool {
    arg.chars().any(|c| QUOTE_TRIGGERS.contains(&c))
}

/// Quote a single argument for a flattened command line.
///
/// ```rust
/// use procpipe_runner::quote::quote_arg;
///
/// assert_eq!(quote_arg("--cached"), "--cached");
/// assert_eq!(quote_arg("my file.txt"), "\"my file.txt\"");
/// ```
#[must_use]
pub fn quote_arg(arg: &str) -> String {
    if needs_quoting(arg) {
        format!("\"{arg}\"")
    } else {
        arg.to_string()
    }
}

/// Normalize `/` to `\` in a program path and quote it.
#[must_use]
pub fn quote_program(program: &str) -> String {
    quote_arg(&program.replace('/', "\\"))
}

/// Build the complete flattened command line for `cmd`.
///
/// ```rust
/// use procpipe_runner::{CommandSpec, quote::command_line};
///
/// let cmd = CommandSpec::new("C:/Program Files/Git/bin/git.exe")
///     .args(["commit", "-m", "fix (again)"]);
/// assert_eq!(
///     command_line(&cmd),
///     r#""C:\Program Files\Git\bin\git.exe" commit -m "fix (again)""#
/// );
/// ```
#[must_use]
pub fn command_line(cmd: &CommandSpec) -> String {
    let mut line = quote_program(&cmd.program);
    for arg in &cmd.args {
        line.push(' ');
        line.push_str(&quote_arg(arg));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_arguments_unchanged() {
        for arg in ["status", "--porcelain", "HEAD", "a.txt", "-", "", "%H|%s"] {
            assert_eq!(quote_arg(arg), arg);
        }
        assert_eq!(quote_arg("refs/heads/main"), "refs/heads/main");
        assert_eq!(quote_arg(r"C:\repo\file"), r"C:\repo\file");
    }

    #[test]
    fn test_each_trigger_forces_quotes() {
        for &c in QUOTE_TRIGGERS {
            let arg = format!("a{c}b");
            assert_eq!(quote_arg(&arg), format!("\"{arg}\""), "trigger {c:?}");
        }
    }

    #[test]
    fn test_embedded_quotes_not_escaped() {
        assert_eq!(quote_arg("say \"hi\""), "\"say \"hi\"\"");
        assert_eq!(quote_arg("\"quoted\""), "\"quoted\"");
    }

    #[test]
    fn test_program_separators_normalized() {
        assert_eq!(quote_program("C:/tools/git.exe"), r"C:\tools\git.exe");
        assert_eq!(
            quote_program("C:/Program Files/git.exe"),
            r#""C:\Program Files\git.exe""#
        );
    }

    #[test]
    fn test_arguments_keep_forward_slashes() {
        let cmd = CommandSpec::new("git").args(["add", "src/lib.rs"]);
        assert_eq!(command_line(&cmd), "git add src/lib.rs");
    }

    #[test]
    fn test_command_line_without_args() {
        assert_eq!(command_line(&CommandSpec::new("git")), "git");
    }

    #[test]
    fn test_empty_argument_is_not_quoted() {
        let cmd = CommandSpec::new("git").args(["", "x"]);
        assert_eq!(command_line(&cmd), "git  x");
    }
}
