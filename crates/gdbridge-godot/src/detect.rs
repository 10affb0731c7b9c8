//! Godot executable discovery
//!
//! Resolution order, first valid candidate wins:
//! 1. the configured path
//! 2. `GODOT_PATH`
//! 3. the bare `godot` token, then the platform's well-known install locations
//!
//! A candidate is valid when it exists (the bare token always does) and
//! `<path> --version` exits successfully. Validity is cached per path string
//! for the life of the resolver, so no candidate is probed twice.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use gdbridge_runner::{CommandSpec, ProcessRunner};
use gdbridge_utils::error::GodotError;
use tracing::{debug, info, warn};

/// Candidate resolved through `PATH` rather than the filesystem.
pub const BARE_GODOT: &str = "godot";

/// Environment variable naming an explicit executable.
pub const GODOT_PATH_ENV: &str = "GODOT_PATH";

/// Operating system family, which decides the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(windows) {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    /// Well-known install locations, without the leading bare token.
    #[must_use]
    pub fn install_locations(self, home: Option<&Path>) -> Vec<String> {
        let home_join = |rel: &str| home.map(|h| h.join(rel).display().to_string());

        match self {
            Self::MacOs => {
                let mut paths = vec![
                    "/Applications/Godot.app/Contents/MacOS/Godot".to_string(),
                    "/Applications/Godot_4.app/Contents/MacOS/Godot".to_string(),
                ];
                paths.extend(
                    [
                        "Applications/Godot.app/Contents/MacOS/Godot",
                        "Applications/Godot_4.app/Contents/MacOS/Godot",
                        "Library/Application Support/Steam/steamapps/common/Godot Engine/Godot.app/Contents/MacOS/Godot",
                    ]
                    .into_iter()
                    .filter_map(home_join),
                );
                paths
            }
            Self::Windows => {
                let mut paths = vec![
                    r"C:\Program Files\Godot\Godot.exe".to_string(),
                    r"C:\Program Files (x86)\Godot\Godot.exe".to_string(),
                    r"C:\Program Files\Godot_4\Godot.exe".to_string(),
                    r"C:\Program Files (x86)\Godot_4\Godot.exe".to_string(),
                ];
                paths.extend(home_join(r"Godot\Godot.exe"));
                paths
            }
            Self::Linux => {
                let mut paths = vec![
                    "/usr/bin/godot".to_string(),
                    "/usr/local/bin/godot".to_string(),
                    "/snap/bin/godot".to_string(),
                ];
                paths.extend(home_join(".local/bin/godot"));
                paths
            }
        }
    }

    /// Path assumed when nothing validates and the policy is permissive.
    #[must_use]
    pub const fn fallback(self) -> &'static str {
        match self {
            Self::MacOs => "/Applications/Godot.app/Contents/MacOS/Godot",
            Self::Windows => r"C:\Program Files\Godot\Godot.exe",
            Self::Linux => "/usr/bin/godot",
        }
    }
}

/// Inputs to [`PathResolver::new`].
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Path from configuration or the command line.
    pub configured_path: Option<String>,
    /// Value of `GODOT_PATH` at startup.
    pub env_path: Option<String>,
    /// Fail instead of falling back when no candidate validates.
    pub strict: bool,
    /// Deadline for each `--version` probe.
    pub probe_timeout: Duration,
    pub platform: Platform,
    pub home: Option<PathBuf>,
}

impl ResolverOptions {
    /// Defaults with `GODOT_PATH` read from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            env_path: std::env::var(GODOT_PATH_ENV).ok(),
            ..Self::default()
        }
    }
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            configured_path: None,
            env_path: None,
            strict: false,
            probe_timeout: Duration::from_secs(10),
            platform: Platform::host(),
            home: dirs::home_dir(),
        }
    }
}

/// Finds, validates, and remembers the engine executable.
pub struct PathResolver {
    runner: Arc<dyn ProcessRunner>,
    options: ResolverOptions,
    current: Mutex<Option<String>>,
    validated: Mutex<HashMap<String, bool>>,
}

impl PathResolver {
    /// Create a resolver.
    ///
    /// A configured path that does not exist on disk is dropped here with a
    /// warning, and resolution falls through to auto-detection.
    pub fn new(runner: Arc<dyn ProcessRunner>, options: ResolverOptions) -> Self {
        let current = options
            .configured_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .and_then(|p| {
                if exists_or_bare(p) {
                    Some(p.to_string())
                } else {
                    warn!(
                        path = %p,
                        "configured Godot path does not exist; falling back to auto-detection"
                    );
                    None
                }
            });

        Self {
            runner,
            options,
            current: Mutex::new(current),
            validated: Mutex::new(HashMap::new()),
        }
    }

    /// Path resolved so far, if any.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        lock(&self.current).clone()
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.options.strict
    }

    /// Whether `path` is a working Godot executable. Results are cached.
    pub async fn is_valid(&self, path: &str) -> bool {
        let cached = lock(&self.validated).get(path).copied();
        if let Some(known) = cached {
            return known;
        }

        let valid = if exists_or_bare(path) {
            let spec = CommandSpec::new(path).arg("--version");
            match self.runner.run(&spec, self.options.probe_timeout).await {
                Ok(output) if output.success() => true,
                Ok(output) => {
                    debug!(
                        path,
                        exit_code = ?output.exit_code,
                        "version probe exited unsuccessfully"
                    );
                    false
                }
                Err(e) => {
                    debug!(path, error = %e, "version probe failed");
                    false
                }
            }
        } else {
            false
        };

        lock(&self.validated).insert(path.to_string(), valid);
        valid
    }

    /// Candidates in resolution order, excluding the configured path.
    #[must_use]
    pub fn candidates(&self) -> Vec<String> {
        let mut candidates = Vec::new();
        if let Some(env) = self.options.env_path.as_deref().filter(|p| !p.is_empty()) {
            candidates.push(env.to_string());
        }
        candidates.push(BARE_GODOT.to_string());
        candidates.extend(
            self.options
                .platform
                .install_locations(self.options.home.as_deref()),
        );
        candidates
    }

    /// Return a usable executable path, detecting one if needed.
    ///
    /// In strict mode an exhausted search is an error. Otherwise the platform
    /// default is remembered and returned with a warning.
    pub async fn resolve(&self) -> Result<String, GodotError> {
        if let Some(path) = self.current()
            && self.is_valid(&path).await
        {
            return Ok(path);
        }

        let candidates = self.candidates();
        for candidate in &candidates {
            if self.is_valid(candidate).await {
                info!(path = %candidate, "found Godot executable");
                *lock(&self.current) = Some(candidate.clone());
                return Ok(candidate.clone());
            }
        }

        if self.options.strict {
            return Err(GodotError::ExecutableNotFound {
                searched: candidates,
            });
        }

        let fallback = self.options.platform.fallback().to_string();
        warn!(
            path = %fallback,
            "could not find a valid Godot executable; using platform default"
        );
        *lock(&self.current) = Some(fallback.clone());
        Ok(fallback)
    }

    /// Replace the remembered path if `path` validates.
    pub async fn set_path(&self, path: &str) -> bool {
        if self.is_valid(path).await {
            *lock(&self.current) = Some(path.to_string());
            true
        } else {
            false
        }
    }
}

impl std::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver")
            .field("options", &self.options)
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

fn exists_or_bare(path: &str) -> bool {
    path == BARE_GODOT || Path::new(path).exists()
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_locations() {
        let paths = Platform::Linux.install_locations(Some(Path::new("/home/me")));
        assert_eq!(
            paths,
            vec![
                "/usr/bin/godot",
                "/usr/local/bin/godot",
                "/snap/bin/godot",
                "/home/me/.local/bin/godot",
            ]
        );
    }

    #[test]
    fn test_macos_locations_include_steam() {
        let paths = Platform::MacOs.install_locations(Some(Path::new("/Users/me")));
        assert_eq!(paths.len(), 5);
        assert_eq!(paths[0], "/Applications/Godot.app/Contents/MacOS/Godot");
        assert!(paths[4].contains("steamapps/common/Godot Engine"));
    }

    #[test]
    fn test_windows_locations_without_home() {
        let paths = Platform::Windows.install_locations(None);
        assert_eq!(paths.len(), 4);
        assert_eq!(paths[0], r"C:\Program Files\Godot\Godot.exe");
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(Platform::Linux.fallback(), "/usr/bin/godot");
        assert_eq!(Platform::Windows.fallback(), r"C:\Program Files\Godot\Godot.exe");
        assert_eq!(
            Platform::MacOs.fallback(),
            "/Applications/Godot.app/Contents/MacOS/Godot"
        );
    }

    #[test]
    fn test_bare_token_always_exists() {
        assert!(exists_or_bare("godot"));
        assert!(!exists_or_bare("/definitely/not/here/godot"));
    }
}
