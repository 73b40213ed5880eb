//! Layered template composition into the target directory
//!
//! Steps run strictly in order and later steps may overwrite earlier ones:
//! base tree, bundler config, bundler plugins, shared scripts.

use super::copier::{copy_file, copy_tree, ExclusionRules};
use super::selector::{TemplatePaths, TemplateSelector};
use crate::config::ProjectConfig;
use crate::error::{Result, ScaffoldError};
use log::{info, warn};
use std::path::PathBuf;

/// Subdirectory of the generated project that receives plugins and scripts
pub const SCRIPTS_DIR: &str = "scripts";

/// Copies the selected templates for one configuration
pub struct TemplateComposer<'a> {
    config: &'a ProjectConfig,
    selector: &'a TemplateSelector,
}

impl<'a> TemplateComposer<'a> {
    pub fn new(config: &'a ProjectConfig, selector: &'a TemplateSelector) -> Self {
        Self { config, selector }
    }

    fn paths(&self) -> TemplatePaths {
        self.selector.paths_for(self.config)
    }

    /// True when the target directory is already taken
    pub fn check_target_exists(&self) -> bool {
        self.config.target_dir().exists()
    }

    /// True when the base template for the framework/language pair exists
    pub fn validate_template(&self) -> bool {
        self.paths().base_dir.is_dir()
    }

    /// Pre-flight: fail before any write if the target exists or a template
    /// directory is missing.
    pub fn preflight(&self) -> Result<()> {
        if self.check_target_exists() {
            return Err(ScaffoldError::TargetExists(
                self.config.target_dir().to_path_buf(),
            ));
        }
        if let Some(missing) = self.paths().missing_dirs().into_iter().next() {
            return Err(ScaffoldError::TemplateMissing(missing));
        }
        Ok(())
    }

    /// Run all copy steps. Returns every file written, relative to the target.
    pub async fn copy_template(&self) -> Result<Vec<PathBuf>> {
        let paths = self.paths();
        if let Some(missing) = paths.missing_dirs().into_iter().next() {
            return Err(ScaffoldError::TemplateMissing(missing));
        }

        let mut written = self.copy_base_template(&paths).await?;
        written.extend(self.copy_bundler_config(&paths).await?);
        written.extend(self.copy_bundler_plugins(&paths).await?);
        written.extend(self.copy_shared_scripts().await?);
        Ok(written)
    }

    async fn copy_base_template(&self, paths: &TemplatePaths) -> Result<Vec<PathBuf>> {
        let copied = copy_tree(
            &paths.base_dir,
            self.config.target_dir(),
            &ExclusionRules::for_base_template(),
        )
        .await?;
        info!(
            "Copied {} base template files ({} / {})",
            copied.len(),
            self.config.framework(),
            self.config.language()
        );
        Ok(copied)
    }

    async fn copy_bundler_config(&self, paths: &TemplatePaths) -> Result<Option<PathBuf>> {
        let dest_name = self.config.bundler().config_file_name();
        if !paths.bundler_config.is_file() {
            warn!(
                "Bundler config not found: {}",
                paths.bundler_config.display()
            );
            return Ok(None);
        }

        copy_file(
            &paths.bundler_config,
            &self.config.target_dir().join(&dest_name),
        )
        .await?;
        info!(
            "Bundler config: {} -> {}",
            paths
                .bundler_config
                .file_name()
                .unwrap_or_default()
                .to_string_lossy(),
            dest_name
        );
        Ok(Some(PathBuf::from(dest_name)))
    }

    async fn copy_bundler_plugins(&self, paths: &TemplatePaths) -> Result<Vec<PathBuf>> {
        let scripts_dir = self.config.target_dir().join(SCRIPTS_DIR);
        tokio::fs::create_dir_all(&scripts_dir)
            .await
            .map_err(|e| ScaffoldError::io(&scripts_dir, e))?;

        let mut copied = Vec::new();
        for plugin in &paths.plugin_files {
            let Some(file_name) = plugin.file_name() else {
                continue;
            };
            if !plugin.is_file() {
                warn!("Bundler plugin not found: {}", plugin.display());
                continue;
            }
            copy_file(plugin, &scripts_dir.join(file_name)).await?;
            copied.push(PathBuf::from(SCRIPTS_DIR).join(file_name));
        }
        info!("Copied {} bundler plugin files", copied.len());
        Ok(copied)
    }

    async fn copy_shared_scripts(&self) -> Result<Vec<PathBuf>> {
        let scripts_dir = self.config.target_dir().join(SCRIPTS_DIR);
        let mut copied = Vec::new();
        for script in self
            .selector
            .shared_script_files(self.config.language())
            .await?
        {
            let Some(file_name) = script.file_name() else {
                continue;
            };
            copy_file(&script, &scripts_dir.join(file_name)).await?;
            copied.push(PathBuf::from(SCRIPTS_DIR).join(file_name));
        }
        info!("Copied {} shared script files", copied.len());
        Ok(copied)
    }
}
