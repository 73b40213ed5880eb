//! Dependency composition from per-axis fragment files
//!
//! One fragment exists per axis value (`package.common.json`,
//! `package.vite.json`, `package.react.json`, ...). Fragments are merged in a
//! fixed order and later fragments win on overlapping package names.

use crate::config::ProjectConfig;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Fragment shared by every configuration
const COMMON_AXIS: &str = "common";

/// Package name -> version range, for both dependency kinds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySet {
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl DependencySet {
    /// Overlay `other` on top of `self`; `other` wins on shared keys
    pub fn merge(&mut self, other: DependencySet) {
        self.dependencies.extend(other.dependencies);
        self.dev_dependencies.extend(other.dev_dependencies);
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }
}

/// Loads and merges dependency fragments
#[derive(Debug, Clone)]
pub struct DependencyManager {
    dependencies_dir: PathBuf,
}

impl DependencyManager {
    pub fn new(dependencies_dir: impl Into<PathBuf>) -> Self {
        Self {
            dependencies_dir: dependencies_dir.into(),
        }
    }

    pub fn dependencies_dir(&self) -> &Path {
        &self.dependencies_dir
    }

    /// `package.{axis}.json`
    pub fn fragment_file_name(axis: &str) -> String {
        format!("package.{}.json", axis)
    }

    /// Fragment axes for a configuration, in merge order
    pub fn fragment_axes(config: &ProjectConfig) -> Vec<&'static str> {
        let mut axes = vec![COMMON_AXIS, config.bundler().as_str()];
        if !config.framework().is_baseline() {
            axes.push(config.framework().as_str());
        }
        if !config.language().is_baseline() {
            axes.push(config.language().as_str());
        }
        axes
    }

    /// Merge common, bundler, framework and language fragments.
    ///
    /// Never fails: a missing or malformed fragment counts as empty.
    pub async fn compose_dependencies(&self, config: &ProjectConfig) -> DependencySet {
        let mut merged = DependencySet::default();
        for axis in Self::fragment_axes(config) {
            merged.merge(self.load_fragment(axis).await);
        }

        info!(
            "Composed dependencies: {} + {} + {}",
            config.bundler(),
            config.framework(),
            config.language()
        );
        merged
    }

    /// Read one fragment, degrading to an empty set on any problem
    pub async fn load_fragment(&self, axis: &str) -> DependencySet {
        let file_name = Self::fragment_file_name(axis);
        let path = self.dependencies_dir.join(&file_name);

        if !path.is_file() {
            warn!("Dependency fragment not found: {}", file_name);
            return DependencySet::default();
        }

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to read dependency fragment {}: {}", file_name, e);
                return DependencySet::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(fragment) => fragment,
            Err(e) => {
                error!("Failed to parse dependency fragment {}: {}", file_name, e);
                DependencySet::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Framework, Language, ProjectDraft};
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn config(framework: Framework, language: Language) -> ProjectConfig {
        ProjectDraft {
            project_name: Some("my-plugin".to_string()),
            description: Some("desc".to_string()),
            framework: Some(framework),
            language: Some(language),
            ..Default::default()
        }
        .validate(Path::new("/work"))
        .unwrap()
    }

    fn write_fragment(dir: &Path, axis: &str, json: &str) {
        std_fs::write(dir.join(DependencyManager::fragment_file_name(axis)), json).unwrap();
    }

    /// Every stage pins `shared` and `stage-<axis>`; later stages must win
    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        for axis in ["common", "vite", "react", "typescript"] {
            write_fragment(
                tmp.path(),
                axis,
                &format!(
                    r#"{{"dependencies": {{"shared": "{axis}", "stage-{axis}": "1.0.0"}},
                        "devDependencies": {{"dev-shared": "{axis}"}}}}"#
                ),
            );
        }
        tmp
    }

    #[test]
    fn test_fragment_axes_skip_baselines() {
        assert_eq!(
            DependencyManager::fragment_axes(&config(Framework::Vanilla, Language::JavaScript)),
            vec!["common", "vite"]
        );
        assert_eq!(
            DependencyManager::fragment_axes(&config(Framework::React, Language::TypeScript)),
            vec!["common", "vite", "react", "typescript"]
        );
    }

    #[test]
    fn test_merge_is_last_write_wins() {
        let mut base = DependencySet::default();
        base.dependencies.insert("a".into(), "1".into());
        base.dependencies.insert("b".into(), "1".into());

        let mut over = DependencySet::default();
        over.dependencies.insert("b".into(), "2".into());
        over.dev_dependencies.insert("c".into(), "3".into());

        base.merge(over);
        assert_eq!(base.dependencies["a"], "1");
        assert_eq!(base.dependencies["b"], "2");
        assert_eq!(base.dev_dependencies["c"], "3");
    }

    #[tokio::test]
    async fn test_compose_override_order() {
        let tmp = fixture();
        let manager = DependencyManager::new(tmp.path());

        let vanilla = manager
            .compose_dependencies(&config(Framework::Vanilla, Language::JavaScript))
            .await;
        assert_eq!(vanilla.dependencies["shared"], "vite");
        assert!(!vanilla.dependencies.contains_key("stage-react"));

        let react = manager
            .compose_dependencies(&config(Framework::React, Language::JavaScript))
            .await;
        assert_eq!(react.dependencies["shared"], "react");
        assert_eq!(react.dev_dependencies["dev-shared"], "react");
        assert!(react.dependencies.contains_key("stage-common"));

        let react_ts = manager
            .compose_dependencies(&config(Framework::React, Language::TypeScript))
            .await;
        assert_eq!(react_ts.dependencies["shared"], "typescript");
        assert_eq!(react_ts.dependencies.len(), 5);
    }

    #[tokio::test]
    async fn test_compose_is_deterministic() {
        let tmp = fixture();
        let manager = DependencyManager::new(tmp.path());
        let config = config(Framework::React, Language::JavaScript);

        let first = serde_json::to_string(&manager.compose_dependencies(&config).await).unwrap();
        let second = serde_json::to_string(&manager.compose_dependencies(&config).await).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_and_malformed_fragments_degrade() {
        let tmp = fixture();
        std_fs::remove_file(tmp.path().join("package.vite.json")).unwrap();
        write_fragment(tmp.path(), "react", "{ not json");
        let manager = DependencyManager::new(tmp.path());

        let deps = manager
            .compose_dependencies(&config(Framework::React, Language::JavaScript))
            .await;
        assert_eq!(deps.dependencies["shared"], "common");
        assert!(!deps.dependencies.contains_key("stage-vite"));
        assert!(!deps.dependencies.contains_key("stage-react"));

        let empty = DependencyManager::new(tmp.path().join("nowhere"))
            .compose_dependencies(&config(Framework::Vanilla, Language::JavaScript))
            .await;
        assert!(empty.is_empty());
    }
}
