// ============================================================================
// CommandSpec - One Invocation
// ============================================================================

/// Specification of a single invocation: program, arguments and stdin payload.
///
/// Arguments are kept as discrete elements. On Unix they reach the child as an
/// argument vector verbatim; on Windows they are quoted into a flattened
/// command line at launch (see [`crate::quote`]).
///
/// # Example
///
/// ```rust
/// use procpipe_runner::CommandSpec;
///
/// let cmd = CommandSpec::new("git")
///     .arg("apply")
///     .arg("--cached")
///     .stdin("diff --git a/x b/x\n");
///
/// assert_eq!(cmd.program, "git");
/// assert_eq!(cmd.args.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to execute, resolved with the platform's search rules
    pub program: String,
    /// Arguments as discrete elements (NOT shell strings)
    pub args: Vec<String>,
    /// Text delivered on the child's stdin, may be empty
    pub stdin: String,
}

impl CommandSpec {
    /// Create a new `CommandSpec` with the given program, no arguments and
    /// an empty stdin payload.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: String::new(),
        }
    }

    /// Add a single argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments to the command.
    ///
    /// ```rust
    /// use procpipe_runner::CommandSpec;
    ///
    /// let cmd = CommandSpec::new("git").args(["status", "--porcelain"]);
    /// assert_eq!(cmd.args, vec!["status", "--porcelain"]);
    /// ```
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the text written to the child's stdin.
    #[must_use]
    pub fn stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = stdin.into();
        self
    }

    /// Reject program or arguments that cannot be handed to the OS.
    ///
    /// Both process-creation primitives terminate strings at NUL, so an
    /// interior NUL would silently truncate an argument.
    pub(crate) fn check_nul(&self) -> Result<(), crate::RunnerError> {
        if self.program.contains('\0') {
            return Err(crate::RunnerError::InvalidArgument {
                program: self.program.replace('\0', "\\0"),
                reason: "program path contains a NUL byte".to_string(),
            });
        }
        if let Some(index) = self.args.iter().position(|a| a.contains('\0')) {
            return Err(crate::RunnerError::InvalidArgument {
                program: self.program.clone(),
                reason: format!("argument {index} contains a NUL byte"),
            });
        }
        Ok(())
    }
}
