//! Template file copying with exclusion filtering

use crate::config::Bundler;
use crate::error::{Result, ScaffoldError};
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Directory that later overlay steps own; never taken from the base tree
const SCRIPTS_DIR: &str = "scripts";

/// Decides which base-template entries are left for the overlay steps
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    config_prefixes: Vec<String>,
    plugin_prefixes: Vec<String>,
    excluded_dirs: Vec<String>,
}

impl ExclusionRules {
    /// Skip bundler configs, bundler plugins and `scripts/` of every known bundler
    pub fn for_base_template() -> Self {
        Self {
            config_prefixes: Bundler::KNOWN_NAMES
                .iter()
                .map(|name| format!("{}.config.", name))
                .collect(),
            plugin_prefixes: Bundler::KNOWN_NAMES
                .iter()
                .map(|name| format!("{}-plugin-", name))
                .collect(),
            excluded_dirs: vec![SCRIPTS_DIR.to_string()],
        }
    }

    /// Whether a path relative to the template root should be skipped
    pub fn is_excluded(&self, relative: &Path, is_dir: bool) -> bool {
        let in_excluded_dir = relative
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .any(|name| self.excluded_dirs.iter().any(|d| d == name));
        if in_excluded_dir {
            return true;
        }
        if is_dir {
            return false;
        }

        let file_name = match relative.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };
        self.config_prefixes
            .iter()
            .chain(self.plugin_prefixes.iter())
            .any(|prefix| file_name.starts_with(prefix.as_str()))
    }
}

/// Copy a single file, creating parent directories as needed
pub async fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ScaffoldError::io(parent, e))?;
    }
    fs::copy(source, dest)
        .await
        .map_err(|e| ScaffoldError::io(source, e))?;
    debug!("Copied {} -> {}", source.display(), dest.display());
    Ok(())
}

/// Copy a directory tree into `target_dir`, skipping excluded entries.
///
/// Returns the copied files relative to `target_dir`, in walk order.
pub async fn copy_tree(
    source_dir: &Path,
    target_dir: &Path,
    rules: &ExclusionRules,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(target_dir)
        .await
        .map_err(|e| ScaffoldError::io(target_dir, e))?;

    let mut copied = Vec::new();
    let walker = WalkDir::new(source_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let relative = entry.path().strip_prefix(source_dir).unwrap_or(entry.path());
            !rules.is_excluded(relative, entry.file_type().is_dir())
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source_dir).to_path_buf();
            ScaffoldError::io(path, e.into())
        })?;
        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .unwrap_or(entry.path())
            .to_path_buf();
        let dest = target_dir.join(&relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)
                .await
                .map_err(|e| ScaffoldError::io(&dest, e))?;
        } else {
            copy_file(entry.path(), &dest).await?;
            copied.push(relative);
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn excluded(path: &str) -> bool {
        ExclusionRules::for_base_template().is_excluded(Path::new(path), false)
    }

    #[test]
    fn test_bundler_files_excluded() {
        assert!(excluded("vite.config.js"));
        assert!(excluded("webpack.config.js"));
        assert!(excluded("vite.config.react.js"));
        assert!(excluded("vite-plugin-devmode.js"));
        assert!(excluded("nested/vite-plugin-args.js"));
    }

    #[test]
    fn test_scripts_directory_excluded() {
        let rules = ExclusionRules::for_base_template();
        assert!(rules.is_excluded(Path::new("scripts"), true));
        assert!(rules.is_excluded(Path::new("scripts/dev-server.js"), false));
        assert!(rules.is_excluded(Path::new("tools/scripts/run.js"), false));
    }

    #[test]
    fn test_regular_files_kept() {
        assert!(!excluded("package.json"));
        assert!(!excluded("src/index.js"));
        assert!(!excluded("src/vite-helpers.js"));
        assert!(!excluded("src/scripts.js"));
    }

    #[tokio::test]
    async fn test_copy_tree_applies_rules() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let target = dst.path().join("out");

        std::fs::create_dir_all(src.path().join("src/ui")).unwrap();
        std::fs::create_dir_all(src.path().join("scripts")).unwrap();
        std::fs::write(src.path().join("package.json"), "{}").unwrap();
        std::fs::write(src.path().join("vite.config.js"), "stale").unwrap();
        std::fs::write(src.path().join("src/ui/main.js"), "main").unwrap();
        std::fs::write(src.path().join("scripts/dev-server.js"), "stale").unwrap();

        let copied = copy_tree(src.path(), &target, &ExclusionRules::for_base_template())
            .await
            .unwrap();

        assert_eq!(
            copied,
            vec![PathBuf::from("package.json"), PathBuf::from("src/ui/main.js")]
        );
        assert!(target.join("src/ui/main.js").is_file());
        assert!(!target.join("vite.config.js").exists());
        assert!(!target.join("scripts").exists());
    }
}
