//! Template selection, copying and post-copy file fixes
//!
//! This module provides:
//! - Template root discovery (flag, environment, install location)
//! - Path resolution for the framework × language × bundler matrix
//! - Layered copying of base tree, bundler config, plugins and shared scripts
//! - Ignore-file and reverse-proxy config materialization

pub mod composer;
pub mod copier;
pub mod files;
pub mod selector;

use std::path::{Path, PathBuf};

pub use composer::TemplateComposer;
pub use files::FileProcessor;
pub use selector::{TemplatePaths, TemplateSelector};

/// Environment variable that overrides the template root
pub const TEMPLATE_DIR_ENV: &str = "RISU_PLUGIN_TEMPLATES";

/// Directory name of the template root next to the executable
const TEMPLATE_DIR_NAME: &str = "templates";

/// Find the template root.
///
/// Order: explicit path, [`TEMPLATE_DIR_ENV`], `templates/` beside the
/// executable, then the repository's `templates/` at build time.
pub fn resolve_template_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(path) = std::env::var_os(TEMPLATE_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(path);
    }

    if let Some(path) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TEMPLATE_DIR_NAME)))
        .filter(|dir| dir.is_dir())
    {
        return path;
    }

    bundled_template_root()
}

/// `templates/` of the source checkout this crate was built from
pub fn bundled_template_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(TEMPLATE_DIR_NAME)
}
