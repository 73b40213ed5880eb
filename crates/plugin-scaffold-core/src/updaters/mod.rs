//! In-place edits of generated files
//!
//! - `manifest`: `package.json` edited as JSON
//! - `config_files`: README, constants, dev server and bundler config edited as text

pub mod config_files;
pub mod manifest;

pub use config_files::ConfigFileUpdater;
pub use manifest::ManifestUpdater;
