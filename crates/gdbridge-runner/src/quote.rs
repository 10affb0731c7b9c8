//! Shell quoting for rendered command lines
//!
//! Commands are always spawned from an argv vector. These helpers exist so the
//! same invocation can be shown as one copy-pasteable line per platform shell.

use std::fmt;

/// Shell family whose quoting rules a rendered command line follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellDialect {
    /// `sh`-compatible shells: single quotes, `'` spelled as `'\''`.
    Posix,
    /// `cmd.exe`: double quotes, embedded `"` escaped as `\"`.
    Windows,
}

impl ShellDialect {
    /// Dialect of the platform this binary was built for.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Quote `value` so the shell reads it back as one argument.
    ///
    /// ```rust
    /// use gdbridge_runner::ShellDialect;
    ///
    /// assert_eq!(ShellDialect::Posix.quote("it's"), r#"'it'\''s'"#);
    /// assert_eq!(ShellDialect::Windows.quote(r#"{"a":1}"#), r#""{\"a\":1}""#);
    /// ```
    #[must_use]
    pub fn quote(self, value: &str) -> String {
        match self {
            Self::Posix => format!("'{}'", value.replace('\'', r"'\''")),
            Self::Windows => format!("\"{}\"", value.replace('"', "\\\"")),
        }
    }

    /// Wrap a filesystem path in double quotes.
    ///
    /// Path components of a rendered command line use double quotes on every
    /// platform so that spaces survive; contents are not escaped.
    #[must_use]
    pub fn quote_path(path: &str) -> String {
        format!("\"{path}\"")
    }
}

impl Default for ShellDialect {
    fn default() -> Self {
        Self::host()
    }
}

impl fmt::Display for ShellDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posix => write!(f, "posix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posix_plain() {
        assert_eq!(ShellDialect::Posix.quote("hello"), "'hello'");
    }

    #[test]
    fn test_posix_single_quote() {
        assert_eq!(ShellDialect::Posix.quote("a'b"), r"'a'\''b'");
    }

    #[test]
    fn test_posix_leaves_double_quotes_alone() {
        assert_eq!(
            ShellDialect::Posix.quote(r#"{"k":"v"}"#),
            r#"'{"k":"v"}'"#
        );
    }

    #[test]
    fn test_windows_escapes_double_quotes() {
        assert_eq!(
            ShellDialect::Windows.quote(r#"{"k":"v"}"#),
            r#""{\"k\":\"v\"}""#
        );
    }

    #[test]
    fn test_windows_leaves_single_quotes_alone() {
        assert_eq!(ShellDialect::Windows.quote("a'b"), "\"a'b\"");
    }

    #[test]
    fn test_quote_path() {
        assert_eq!(
            ShellDialect::quote_path("/home/me/My Game"),
            "\"/home/me/My Game\""
        );
    }

    #[test]
    fn test_host_matches_target() {
        if cfg!(windows) {
            assert_eq!(ShellDialect::host(), ShellDialect::Windows);
        } else {
            assert_eq!(ShellDialect::host(), ShellDialect::Posix);
        }
    }
}
