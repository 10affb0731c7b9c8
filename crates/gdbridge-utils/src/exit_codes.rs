//! Exit code constants for the gdbridge CLI.
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments, configuration, or request |
//! | 10 | `TIMEOUT` | An engine invocation timed out |
//! | 69 | `GODOT_NOT_FOUND` | No usable Godot executable was found |
//! | 70 | `GODOT_FAILURE` | The engine could not be run |

/// Process exit code.
///
/// ```rust
/// use gdbridge_utils::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::from_i32(69), ExitCode::GODOT_NOT_FOUND);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Clean exit.
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Anything not covered below, including failed doctor checks.
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments, configuration, or request
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// An engine invocation exceeded its timeout
    pub const TIMEOUT: ExitCode = ExitCode(10);

    /// No valid Godot executable could be located
    pub const GODOT_NOT_FOUND: ExitCode = ExitCode(69);

    /// The Godot process failed to start or could not be waited on
    pub const GODOT_FAILURE: ExitCode = ExitCode(70);

    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}
