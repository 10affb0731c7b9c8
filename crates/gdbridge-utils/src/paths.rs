//! Checks applied to paths that arrive in tool requests

use std::path::{Component, Path, PathBuf};

/// Marker file at the root of every Godot project.
pub const PROJECT_FILE: &str = "project.godot";

/// Godot resource path scheme.
pub const RESOURCE_PREFIX: &str = "res://";

/// True when `path` is usable as a request path: non-empty and free of `..`.
///
/// The check is textual. `..` anywhere in the string rejects it, including
/// inside a file name such as `a..b`.
#[must_use]
pub fn is_safe_request_path(path: &str) -> bool {
    !path.is_empty() && !path.contains("..")
}

/// Whether `dir` contains a `project.godot` file.
#[must_use]
pub fn is_godot_project(dir: impl AsRef<Path>) -> bool {
    dir.as_ref().join(PROJECT_FILE).is_file()
}

/// Strip a leading `res://` so the path can be joined to the project root.
#[must_use]
pub fn strip_resource_prefix(path: &str) -> &str {
    path.strip_prefix(RESOURCE_PREFIX).unwrap_or(path)
}

/// Resolve a project-relative path (optionally `res://`-prefixed) under `project`.
///
/// Root, drive prefix and `..` components are dropped, so an absolute request
/// path such as `/etc/hostname` still lands under `project`.
#[must_use]
pub fn project_file(project: impl AsRef<Path>, relative: &str) -> PathBuf {
    let relative = strip_resource_prefix(relative).trim_start_matches(['/', '\\']);
    let mut resolved = project.as_ref().to_path_buf();
    resolved.extend(
        Path::new(relative)
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part),
                _ => None,
            }),
    );
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_safe_request_paths() {
        assert!(is_safe_request_path("/home/me/game"));
        assert!(is_safe_request_path("scenes/main.tscn"));
        assert!(is_safe_request_path("res://scenes/main.tscn"));
        assert!(!is_safe_request_path(""));
        assert!(!is_safe_request_path("../etc/passwd"));
        assert!(!is_safe_request_path("scenes/../../secret"));
        assert!(!is_safe_request_path("C:\\games\\..\\windows"));
    }

    #[test]
    fn test_is_godot_project() {
        let dir = TempDir::new().unwrap();
        assert!(!is_godot_project(dir.path()));
        std::fs::write(dir.path().join(PROJECT_FILE), "config_version=5\n").unwrap();
        assert!(is_godot_project(dir.path()));
    }

    #[test]
    fn test_project_godot_directory_is_not_a_project() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(PROJECT_FILE)).unwrap();
        assert!(!is_godot_project(dir.path()));
    }

    #[test]
    fn test_strip_resource_prefix() {
        assert_eq!(strip_resource_prefix("res://levels/a.tscn"), "levels/a.tscn");
        assert_eq!(strip_resource_prefix("levels/a.tscn"), "levels/a.tscn");
        assert_eq!(
            project_file("/game", "res://levels/a.tscn"),
            PathBuf::from("/game/levels/a.tscn")
        );
    }

    #[test]
    fn test_absolute_request_path_stays_under_project() {
        assert_eq!(
            project_file("/game", "/etc/hostname"),
            PathBuf::from("/game/etc/hostname")
        );
        assert_eq!(
            project_file("/game", "res:///etc/hostname"),
            PathBuf::from("/game/etc/hostname")
        );
        assert!(project_file("/game", "\\\\server\\share").starts_with("/game"));
        assert!(project_file("/game", "//etc/hostname").starts_with("/game"));
    }

    proptest! {
        #[test]
        fn prop_any_parent_sequence_is_rejected(prefix in "[a-z/]{0,8}", suffix in "[a-z/]{0,8}") {
            let path = format!("{prefix}..{suffix}");
            prop_assert!(!is_safe_request_path(&path));
        }

        #[test]
        fn prop_project_file_never_leaves_project(relative in "[a-zA-Z:/\\\\.]{0,16}") {
            prop_assert!(project_file("/game", &relative).starts_with("/game"));
        }
    }
}
