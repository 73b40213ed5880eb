//! Plugin Scaffold Core - composition pipeline for RISU plugin projects
//!
//! A run turns one validated [`ProjectConfig`] into a project directory by
//! layering templates, composing dependency fragments and patching the
//! generated files.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - template selection and copying, dependency
//!   composition, manifest and text-file updates
//! - **Layer 2: Workflow Orchestration** - [`ProjectGenerator`] runs pre-flight
//!   checks and the steps in order
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use plugin_scaffold_core::{Framework, Language, ProjectDraft, ProjectGenerator};
//!
//! let draft = ProjectDraft {
//!     project_name: Some("my-plugin".into()),
//!     description: Some("My Plugin for RISU AI".into()),
//!     framework: Some(Framework::Vanilla),
//!     language: Some(Language::JavaScript),
//!     ..Default::default()
//! };
//! let generator = ProjectGenerator::from_draft(&draft, &cwd, templates::resolve_template_root(None))?;
//! generator.compose().await?;
//! ```

pub mod config;
pub mod dependencies;
pub mod error;
pub mod generator;
pub mod registry;
pub mod runtime;
pub mod templates;
pub mod updaters;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{Bundler, Framework, Language, ProjectConfig, ProjectDraft};
pub use dependencies::{DependencyManager, DependencySet};
pub use error::{ConfigError, Result, ScaffoldError};
pub use generator::{GeneratedProject, ProjectGenerator};
pub use registry::{PackageInfo, RegistryClient};
pub use runtime::{PackageInstaller, RuntimeInfo};
pub use templates::{resolve_template_root, TemplateSelector};

#[cfg(feature = "tui")]
pub use tui::{run, CreateArgs};
