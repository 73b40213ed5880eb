//! Error types for the composition pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a [`ProjectDraft`](crate::config::ProjectDraft) fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("project name is required")]
    MissingProjectName,

    #[error(
        "project name '{0}' must be kebab-case: lowercase letters, digits and single hyphens, \
         starting with a letter"
    )]
    InvalidProjectName(String),

    #[error("project description is required")]
    MissingDescription,

    #[error("framework is not selected")]
    MissingFramework,

    #[error("language is not selected")]
    MissingLanguage,

    #[error("port {0} is outside the allowed range 1024-65535")]
    PortOutOfRange(u16),

    #[error("a proxy domain is required when the proxy is enabled")]
    MissingProxyDomain,
}

/// Errors raised while composing a project on disk.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("a folder with the same name already exists: {}", .0.display())]
    TargetExists(PathBuf),

    #[error("template directory not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected structure in {}: {reason}", path.display())]
    ManifestShape { path: PathBuf, reason: String },

    #[error("dependency installation failed: {0}")]
    Installer(String),
}

impl ScaffoldError {
    /// Attach the offending path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures detected before anything was written.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::TargetExists(_) | Self::TemplateMissing(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
