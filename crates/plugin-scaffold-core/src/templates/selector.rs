//! Resolves template source paths for a framework × language × bundler choice
//!
//! Resolvers return paths whether or not they exist; callers decide what a
//! missing path means.

use crate::config::{Bundler, Framework, Language, ProjectConfig};
use crate::error::{Result, ScaffoldError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Extension of the shared script files copied into `scripts/`
const SHARED_SCRIPT_EXT: &str = "js";

/// Looks up template locations under one template root
#[derive(Debug, Clone)]
pub struct TemplateSelector {
    root: PathBuf,
}

impl TemplateSelector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `frameworks/{framework}/{lang}`
    pub fn base_template_dir(&self, framework: Framework, language: Language) -> PathBuf {
        self.root
            .join("frameworks")
            .join(framework.as_str())
            .join(language.code())
    }

    /// `bundlers/{bundler}/{lang}`
    pub fn bundler_dir(&self, bundler: Bundler, language: Language) -> PathBuf {
        self.root
            .join("bundlers")
            .join(bundler.as_str())
            .join(language.code())
    }

    /// `bundlers/{bundler}/{lang}/{bundler}.config.{framework}.{lang}`
    pub fn bundler_config_file(
        &self,
        bundler: Bundler,
        framework: Framework,
        language: Language,
    ) -> PathBuf {
        let file_name = format!(
            "{}.config.{}.{}",
            bundler.as_str(),
            framework.as_str(),
            language.code()
        );
        self.bundler_dir(bundler, language).join(file_name)
    }

    pub fn bundler_plugin_files(&self, bundler: Bundler, language: Language) -> Vec<PathBuf> {
        let dir = self.bundler_dir(bundler, language);
        bundler
            .plugin_file_names()
            .iter()
            .map(|name| dir.join(name))
            .collect()
    }

    /// `scripts/{lang}`
    pub fn shared_scripts_dir(&self, language: Language) -> PathBuf {
        self.root.join("scripts").join(language.code())
    }

    /// Script files in the shared scripts directory, sorted by name.
    /// Empty when the directory does not exist.
    pub async fn shared_script_files(&self, language: Language) -> Result<Vec<PathBuf>> {
        let dir = self.shared_scripts_dir(language);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| ScaffoldError::io(&dir, e))?;
        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ScaffoldError::io(&dir, e))?
        {
            let path = entry.path();
            let is_script = path
                .extension()
                .is_some_and(|ext| ext == SHARED_SCRIPT_EXT);
            if is_script && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// `dependencies/`
    pub fn dependencies_dir(&self) -> PathBuf {
        self.root.join("dependencies")
    }

    /// Resolve every path a generation run needs
    pub fn paths_for(&self, config: &ProjectConfig) -> TemplatePaths {
        let (framework, language, bundler) =
            (config.framework(), config.language(), config.bundler());
        TemplatePaths {
            base_dir: self.base_template_dir(framework, language),
            bundler_dir: self.bundler_dir(bundler, language),
            bundler_config: self.bundler_config_file(bundler, framework, language),
            plugin_files: self.bundler_plugin_files(bundler, language),
            shared_scripts_dir: self.shared_scripts_dir(language),
        }
    }
}

/// Source locations for one configuration. Computed per run, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePaths {
    pub base_dir: PathBuf,
    pub bundler_dir: PathBuf,
    pub bundler_config: PathBuf,
    pub plugin_files: Vec<PathBuf>,
    pub shared_scripts_dir: PathBuf,
}

impl TemplatePaths {
    /// Directories that must exist before anything is copied
    pub fn required_dirs(&self) -> [&Path; 3] {
        [&self.base_dir, &self.bundler_dir, &self.shared_scripts_dir]
    }

    pub fn missing_dirs(&self) -> Vec<PathBuf> {
        self.required_dirs()
            .into_iter()
            .filter(|dir| !dir.is_dir())
            .map(Path::to_path_buf)
            .collect()
    }
}
