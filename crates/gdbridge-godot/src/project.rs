//! Filesystem scanning for Godot projects

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use gdbridge_utils::paths::{PROJECT_FILE, is_godot_project};

static CONFIG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"config/name="([^"]+)""#).expect("config name pattern is valid"));

const SCENE_EXTENSIONS: &[&str] = &["tscn"];
const SCRIPT_EXTENSIONS: &[&str] = &["gd", "gdscript", "cs"];
const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "svg", "ttf", "wav", "mp3", "ogg",
];

/// A project found by [`find_projects`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectEntry {
    pub path: PathBuf,
    pub name: String,
}

/// File counts by kind, hidden entries excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectStructure {
    pub scenes: usize,
    pub scripts: usize,
    pub assets: usize,
    pub other: usize,
}

/// Find projects at or under `directory`.
///
/// `directory` itself is reported when it is a project. Without `recursive`,
/// only its immediate subdirectories are checked. With `recursive`, hidden
/// directories are skipped and the search does not descend into projects.
/// Unreadable directories are skipped.
#[must_use]
pub fn find_projects(directory: &Path, recursive: bool) -> Vec<ProjectEntry> {
    let mut projects = Vec::new();
    if is_godot_project(directory) {
        projects.push(entry_for(directory));
    }
    collect_projects(directory, recursive, &mut projects);
    projects
}

fn collect_projects(directory: &Path, recursive: bool, out: &mut Vec<ProjectEntry>) {
    let subdirs = match subdirectories(directory) {
        Ok(subdirs) => subdirs,
        Err(e) => {
            debug!(directory = %directory.display(), error = %e, "skipping unreadable directory");
            return;
        }
    };

    for (name, path) in subdirs {
        if recursive && name.starts_with('.') {
            continue;
        }
        if is_godot_project(&path) {
            out.push(ProjectEntry { path, name });
        } else if recursive {
            collect_projects(&path, true, out);
        }
    }
}

fn subdirectories(directory: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn entry_for(directory: &Path) -> ProjectEntry {
    ProjectEntry {
        path: directory.to_path_buf(),
        name: basename(directory),
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Count scenes, scripts, assets, and other files under `project`.
pub fn project_structure(project: &Path) -> io::Result<ProjectStructure> {
    let mut structure = ProjectStructure::default();
    count_files(project, &mut structure)?;
    Ok(structure)
}

fn count_files(directory: &Path, structure: &mut ProjectStructure) -> io::Result<()> {
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            count_files(&entry.path(), structure)?;
        } else if file_type.is_file() {
            let ext = name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
            let ext = ext.as_str();
            if SCENE_EXTENSIONS.contains(&ext) {
                structure.scenes += 1;
            } else if SCRIPT_EXTENSIONS.contains(&ext) {
                structure.scripts += 1;
            } else if ASSET_EXTENSIONS.contains(&ext) {
                structure.assets += 1;
            } else {
                structure.other += 1;
            }
        }
    }
    Ok(())
}

/// Name from `config/name="..."` in `project.godot`, else the directory name.
#[must_use]
pub fn project_name(project: &Path) -> String {
    match fs::read_to_string(project.join(PROJECT_FILE)) {
        Ok(content) => CONFIG_NAME
            .captures(&content)
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| basename(project)),
        Err(e) => {
            debug!(project = %project.display(), error = %e, "could not read project file");
            basename(project)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_project(dir: &Path, config: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(PROJECT_FILE), config).unwrap();
    }

    #[test]
    fn test_project_name_from_config() {
        let temp = TempDir::new().unwrap();
        make_project(
            temp.path(),
            "[application]\nconfig/name=\"Space Blaster\"\nrun/main_scene=\"res://main.tscn\"\n",
        );
        assert_eq!(project_name(temp.path()), "Space Blaster");
    }

    #[test]
    fn test_project_name_falls_back_to_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("my_game");
        make_project(&dir, "config_version=5\n");
        assert_eq!(project_name(&dir), "my_game");

        let missing = temp.path().join("nothing_here");
        assert_eq!(project_name(&missing), "nothing_here");
    }

    #[test]
    fn test_structure_counts_and_skips_hidden() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        make_project(root, "");
        fs::create_dir_all(root.join("scenes/levels")).unwrap();
        fs::create_dir_all(root.join(".godot/imported")).unwrap();
        fs::write(root.join("scenes/main.tscn"), "").unwrap();
        fs::write(root.join("scenes/levels/one.TSCN"), "").unwrap();
        fs::write(root.join("player.gd"), "").unwrap();
        fs::write(root.join("Boss.cs"), "").unwrap();
        fs::write(root.join("icon.svg"), "").unwrap();
        fs::write(root.join("music.ogg"), "").unwrap();
        fs::write(root.join(".godot/imported/icon.png"), "").unwrap();
        fs::write(root.join(".hidden.gd"), "").unwrap();

        let structure = project_structure(root).unwrap();
        assert_eq!(
            structure,
            ProjectStructure {
                scenes: 2,
                scripts: 2,
                assets: 2,
                // project.godot
                other: 1,
            }
        );
    }

    #[test]
    fn test_find_projects_non_recursive() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        make_project(&root.join("alpha"), "");
        make_project(&root.join("nested/beta"), "");
        make_project(&root.join(".hidden"), "");

        let found = find_projects(root, false);
        let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec![".hidden", "alpha"]);
    }

    #[test]
    fn test_find_projects_recursive() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        make_project(&root.join("alpha"), "");
        make_project(&root.join("alpha/inner"), "");
        make_project(&root.join("nested/deeper/beta"), "");
        make_project(&root.join(".hidden/gamma"), "");

        let found = find_projects(root, true);
        let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_directory_itself_is_reported() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("solo");
        make_project(&root, "");

        let found = find_projects(&root, false);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "solo");
        assert_eq!(found[0].path, root);
    }
}
