// src/infra/paths.rs — Storage layout
//
// The layout is resolved once by the binary (from --home, RULECATCH_HOME or the
// platform data dir) and passed down explicitly. Nothing below the CLI reads the
// environment or the working directory.

use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

const LAST_TURN_FILE: &str = "last-turn.json";
const RULES_FILE: &str = "rules.json";

/// Platform data directory (e.g. ~/.local/share/rulecatch), if a home directory exists.
pub fn default_home() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rulecatch").map(|d| d.data_local_dir().to_path_buf())
}

/// Stable per-project directory name: a readable slug plus a short hash of the
/// full path so that `/a/b-c` and `/a-b/c` do not collide.
pub fn project_key(project_root: &Path) -> String {
    let raw = project_root.to_string_lossy();
    let mut slug = slug::slugify(raw.as_ref());
    if slug.is_empty() {
        slug = "root".into();
    }
    if slug.len() > 48 {
        slug = crate::util::truncate_str(&slug, 48)
            .trim_end_matches('-')
            .to_string();
    }
    let digest = Sha256::digest(raw.as_bytes());
    format!("{}-{}", slug, &hex::encode(digest)[..8])
}

/// Root of all rulecatch state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Config file path
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    pub fn project_dir(&self, project_root: &Path) -> PathBuf {
        self.projects_dir().join(project_key(project_root))
    }

    /// The single prior-turn record kept per project.
    pub fn last_turn_path(&self, project_root: &Path) -> PathBuf {
        self.project_dir(project_root).join(LAST_TURN_FILE)
    }

    pub fn rules_path(&self, project_root: &Path) -> PathBuf {
        self.project_dir(project_root).join(RULES_FILE)
    }

    /// Every `last-turn.json` under the projects directory, for cleanup.
    pub fn all_last_turn_paths(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.projects_dir())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
                    .map(|e| e.path().join(LAST_TURN_FILE))
                    .filter(|p| p.exists())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_project_key_is_stable_and_readable() {
        let a = project_key(Path::new("/home/dev/my-app"));
        let b = project_key(Path::new("/home/dev/my-app"));
        assert_eq!(a, b);
        assert!(a.starts_with("home-dev-my-app-"));
    }

    #[test]
    fn test_project_key_avoids_slug_collisions() {
        let a = project_key(Path::new("/a/b-c"));
        let b = project_key(Path::new("/a-b/c"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_project_key_root_path() {
        let k = project_key(Path::new("/"));
        assert!(k.starts_with("root-"));
    }

    #[test]
    fn test_layout_paths() {
        let layout = StorageLayout::new("/tmp/rc");
        let project = Path::new("/work/proj");
        assert_eq!(layout.config_file(), PathBuf::from("/tmp/rc/config.toml"));
        assert!(layout
            .rules_path(project)
            .starts_with("/tmp/rc/projects"));
        assert!(layout.last_turn_path(project).ends_with("last-turn.json"));
    }

    #[test]
    fn test_all_last_turn_paths_only_existing() {
        let dir = TempDir::new().unwrap();
        let layout = StorageLayout::new(dir.path());
        let with = layout.project_dir(Path::new("/p/one"));
        let without = layout.project_dir(Path::new("/p/two"));
        std::fs::create_dir_all(&with).unwrap();
        std::fs::create_dir_all(&without).unwrap();
        std::fs::write(with.join("last-turn.json"), "{}").unwrap();

        let found = layout.all_last_turn_paths();
        assert_eq!(found, vec![with.join("last-turn.json")]);
    }

    #[test]
    fn test_all_last_turn_paths_missing_root() {
        let layout = StorageLayout::new("/nonexistent/rulecatch-home");
        assert!(layout.all_last_turn_paths().is_empty());
    }
}
