//! Engine version parsing and the 4.4 capability floor

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::time::Duration;

use gdbridge_runner::{CommandSpec, ProcessRunner};
use gdbridge_utils::error::GodotError;

static VERSION_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)").expect("version pattern is valid"));

/// Leading `MAJOR.MINOR` of an engine version string such as `4.4.1.stable.official`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GodotVersion {
    pub major: u32,
    pub minor: u32,
}

impl GodotVersion {
    /// First version with UID support.
    pub const UID_SUPPORT: GodotVersion = GodotVersion { major: 4, minor: 4 };

    /// Parse the leading digits. Anything else yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = VERSION_PREFIX.captures(raw.trim())?;
        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
        })
    }

    #[must_use]
    pub fn supports_uids(self) -> bool {
        self >= Self::UID_SUPPORT
    }
}

impl fmt::Display for GodotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Whether `raw` names Godot 4.4 or later. Unparseable strings are `false`.
#[must_use]
pub fn is_godot44_or_later(raw: &str) -> bool {
    GodotVersion::parse(raw).is_some_and(GodotVersion::supports_uids)
}

/// Fail with [`GodotError::UnsupportedVersion`] unless `raw` is 4.4 or later.
pub fn require_uid_support(feature: &'static str, raw: &str) -> Result<(), GodotError> {
    if is_godot44_or_later(raw) {
        Ok(())
    } else {
        Err(GodotError::UnsupportedVersion {
            feature,
            required: "4.4",
            current: raw.trim().to_string(),
        })
    }
}

/// Run `<godot> --version` and return the trimmed stdout.
pub async fn probe_version(
    runner: &dyn ProcessRunner,
    godot_path: &str,
    timeout: Duration,
) -> Result<String, GodotError> {
    let spec = CommandSpec::new(godot_path).arg("--version");
    let output = runner
        .run(&spec, timeout)
        .await
        .map_err(|e| GodotError::VersionProbeFailed {
            path: godot_path.to_string(),
            reason: e.to_string(),
        })?;

    if !output.success() {
        return Err(GodotError::VersionProbeFailed {
            path: godot_path.to_string(),
            reason: match output.exit_code {
                Some(code) => format!("exit code {code}: {}", output.stderr_string().trim()),
                None => "terminated by signal".to_string(),
            },
        });
    }

    Ok(output.stdout_string().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            GodotVersion::parse("4.4.1.stable.official.49a5bc7b6"),
            Some(GodotVersion { major: 4, minor: 4 })
        );
        assert_eq!(
            GodotVersion::parse("  3.5.stable\n"),
            Some(GodotVersion { major: 3, minor: 5 })
        );
        assert_eq!(GodotVersion::parse("v4.4"), None);
        assert_eq!(GodotVersion::parse("4"), None);
        assert_eq!(GodotVersion::parse(""), None);
    }

    #[test]
    fn test_uid_floor() {
        assert!(is_godot44_or_later("4.4.0.stable"));
        assert!(is_godot44_or_later("4.10.dev"));
        assert!(is_godot44_or_later("5.0.beta"));
        assert!(!is_godot44_or_later("4.3.0.stable"));
        assert!(!is_godot44_or_later("3.6"));
        assert!(!is_godot44_or_later("garbage"));
    }

    #[test]
    fn test_require_names_floor() {
        let err = require_uid_support("UIDs", "4.3.0.stable").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("4.4"));
        assert!(message.contains("4.3.0.stable"));
        assert!(require_uid_support("UIDs", "4.4.1").is_ok());
    }
}
