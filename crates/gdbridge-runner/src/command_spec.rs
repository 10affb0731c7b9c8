use std::ffi::OsString;
use tokio::process::Command as TokioCommand;

use crate::quote::ShellDialect;

/// An engine invocation as a program plus discrete arguments.
///
/// Version probes, editor launches, debug runs and scripted operations are
/// all built as a `CommandSpec` and spawned without a shell, so a JSON
/// payload full of quotes and `;` is still exactly one argument.
///
/// ```rust
/// use gdbridge_runner::CommandSpec;
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("godot")
///     .arg("--headless")
///     .args(["--path", "/games/demo"]);
///
/// assert_eq!(cmd.program, OsString::from("godot"));
/// assert_eq!(cmd.args.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append arguments in order.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program name for log lines and error messages.
    #[must_use]
    pub fn program_display(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Render the command as a single line quoted for `dialect`.
    ///
    /// Every element is quoted, so the line can be pasted into a terminal
    /// to reproduce the invocation. Used for debug logging only.
    #[must_use]
    pub fn display_line(&self, dialect: ShellDialect) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| dialect.quote(&part.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Both the one-shot runner and the supervisor spawn through this.
    #[must_use]
    pub fn to_tokio_command(&self) -> TokioCommand {
        let mut cmd = TokioCommand::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}
