//! `package.json` updates

use crate::config::ProjectConfig;
use crate::dependencies::{DependencyManager, DependencySet};
use crate::error::{Result, ScaffoldError};
use crate::templates::files::PROXY_CONFIG;
use log::{info, warn};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const MANIFEST_FILE: &str = "package.json";

/// Multi-process launcher the template's dev script is expected to use
pub const DEV_LAUNCHER: &str = "concurrently";

/// Sub-command appended to the dev script when the proxy is enabled
pub fn proxy_dev_command() -> String {
    format!("caddy run --config {} --adapter caddyfile", PROXY_CONFIG)
}

/// Outcome of the proxy edit of `scripts.dev`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevScriptEdit {
    Appended,
    AlreadyPresent,
    MissingScript,
    UnknownLauncher,
}

/// Rewrites the generated package manifest
pub struct ManifestUpdater<'a> {
    config: &'a ProjectConfig,
    dependencies: &'a DependencyManager,
}

impl<'a> ManifestUpdater<'a> {
    pub fn new(config: &'a ProjectConfig, dependencies: &'a DependencyManager) -> Self {
        Self {
            config,
            dependencies,
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.config.target_dir().join(MANIFEST_FILE)
    }

    pub async fn update(&self) -> Result<()> {
        let path = self.manifest_path();
        let mut manifest = read_manifest(&path).await?;

        apply_project_info(&mut manifest, self.config);

        let composed = self.dependencies.compose_dependencies(self.config).await;
        merge_dependencies(&mut manifest, &composed)
            .map_err(|reason| ScaffoldError::ManifestShape {
                path: path.clone(),
                reason,
            })?;

        if self.config.use_proxy() {
            match add_proxy_to_dev_script(&mut manifest) {
                DevScriptEdit::Appended => info!("Added the proxy to the dev script"),
                DevScriptEdit::AlreadyPresent => {}
                DevScriptEdit::MissingScript => {
                    warn!("No dev script found in {}; add the proxy manually", MANIFEST_FILE)
                }
                DevScriptEdit::UnknownLauncher => warn!(
                    "The dev script does not use {}; add `{}` manually",
                    DEV_LAUNCHER,
                    proxy_dev_command()
                ),
            }
        }

        write_manifest(&path, &manifest).await
    }
}

async fn read_manifest(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ScaffoldError::io(path, e))?;
    let value: Value = serde_json::from_str(&content).map_err(|e| ScaffoldError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ScaffoldError::ManifestShape {
            path: path.to_path_buf(),
            reason: "top level is not an object".to_string(),
        }),
    }
}

async fn write_manifest(path: &Path, manifest: &Map<String, Value>) -> Result<()> {
    let mut content = serde_json::to_string_pretty(manifest).map_err(|e| ScaffoldError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    content.push('\n');
    fs::write(path, content)
        .await
        .map_err(|e| ScaffoldError::io(path, e))
}

/// Set `name`, `description` and the two output-file fields
pub fn apply_project_info(manifest: &mut Map<String, Value>, config: &ProjectConfig) {
    let output = config.output_file();
    manifest.insert("name".into(), config.project_name().into());
    manifest.insert("description".into(), config.description().into());
    manifest.insert("browser".into(), output.clone().into());
    manifest.insert("unpkg".into(), output.into());
}

/// Union the composed dependencies into the manifest's own maps.
/// Composed versions win; an empty composed map leaves the field untouched.
pub fn merge_dependencies(
    manifest: &mut Map<String, Value>,
    composed: &DependencySet,
) -> std::result::Result<(), String> {
    merge_field(manifest, "dependencies", &composed.dependencies)?;
    merge_field(manifest, "devDependencies", &composed.dev_dependencies)
}

fn merge_field(
    manifest: &mut Map<String, Value>,
    field: &str,
    composed: &BTreeMap<String, String>,
) -> std::result::Result<(), String> {
    if composed.is_empty() {
        return Ok(());
    }

    let entry = manifest
        .entry(field.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(existing) = entry else {
        return Err(format!("`{}` is not an object", field));
    };
    for (name, version) in composed {
        existing.insert(name.clone(), Value::String(version.clone()));
    }
    Ok(())
}

/// Append the proxy process to a `concurrently` dev script
pub fn add_proxy_to_dev_script(manifest: &mut Map<String, Value>) -> DevScriptEdit {
    let Some(Value::String(script)) = manifest
        .get_mut("scripts")
        .and_then(|scripts| scripts.get_mut("dev"))
    else {
        return DevScriptEdit::MissingScript;
    };

    let command = proxy_dev_command();
    if script.contains(&command) {
        return DevScriptEdit::AlreadyPresent;
    }
    if !script.contains(DEV_LAUNCHER) {
        return DevScriptEdit::UnknownLauncher;
    }

    script.push_str(&format!(" \"{}\"", command));
    DevScriptEdit::Appended
}
