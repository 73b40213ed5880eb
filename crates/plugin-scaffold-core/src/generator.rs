//! Pipeline orchestration
//!
//! Validation and pre-flight run before anything is written. After that the
//! steps run in a fixed order with no retry and no rollback: a failure part
//! way leaves a partially composed project on disk.

use crate::config::{ProjectConfig, ProjectDraft};
use crate::dependencies::DependencyManager;
use crate::error::Result;
use crate::runtime::PackageInstaller;
use crate::templates::{FileProcessor, TemplateComposer, TemplateSelector};
use crate::updaters::{ConfigFileUpdater, ManifestUpdater};
use log::info;
use std::path::{Path, PathBuf};

/// Result of a successful composition
#[derive(Debug, Clone)]
pub struct GeneratedProject {
    pub target_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Runs the composition pipeline for one validated configuration
pub struct ProjectGenerator {
    config: ProjectConfig,
    selector: TemplateSelector,
    dependencies: DependencyManager,
}

impl ProjectGenerator {
    pub fn new(config: ProjectConfig, template_root: impl Into<PathBuf>) -> Self {
        let selector = TemplateSelector::new(template_root);
        let dependencies = DependencyManager::new(selector.dependencies_dir());
        Self {
            config,
            selector,
            dependencies,
        }
    }

    /// Validate a draft and build a generator for it
    pub fn from_draft(
        draft: &ProjectDraft,
        base_dir: &Path,
        template_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        let config = draft.validate(base_dir)?;
        Ok(Self::new(config, template_root))
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn selector(&self) -> &TemplateSelector {
        &self.selector
    }

    /// Target must not exist and every template source directory must
    pub fn preflight(&self) -> Result<()> {
        TemplateComposer::new(&self.config, &self.selector).preflight()
    }

    /// Pre-flight, then copy, file fixes, manifest and text config updates
    pub async fn compose(&self) -> Result<GeneratedProject> {
        self.preflight()?;
        info!(
            "Creating {} in {}",
            self.config.project_name(),
            self.config.target_dir().display()
        );

        let files = TemplateComposer::new(&self.config, &self.selector)
            .copy_template()
            .await?;
        FileProcessor::new(&self.config).process_all_files().await?;
        ManifestUpdater::new(&self.config, &self.dependencies)
            .update()
            .await?;
        ConfigFileUpdater::new(&self.config).update_all().await?;

        info!("Project files ready ({} copied)", files.len());
        Ok(GeneratedProject {
            target_dir: self.config.target_dir().to_path_buf(),
            files,
        })
    }

    /// [`compose`](Self::compose) followed by the package installer
    pub async fn generate(&self, installer: &PackageInstaller) -> Result<GeneratedProject> {
        let project = self.compose().await?;
        installer.install(&project.target_dir).await?;
        Ok(project)
    }
}
