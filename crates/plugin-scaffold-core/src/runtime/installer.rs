//! Dependency installation in the generated project

use super::check::NPM_PROGRAM;
use crate::error::{Result, ScaffoldError};
use log::info;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Package manager invocation run inside the target directory
#[derive(Debug, Clone)]
pub struct PackageInstaller {
    program: String,
    args: Vec<String>,
}

impl PackageInstaller {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// `npm install`
    pub fn npm() -> Self {
        Self::new(NPM_PROGRAM, &["install"])
    }

    /// Human-readable command line
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion with the terminal's stdio attached
    pub async fn install(&self, project_dir: &Path) -> Result<()> {
        info!("Running {} in {}", self.command_line(), project_dir.display());

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(project_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                ScaffoldError::Installer(format!("failed to start {}: {}", self.program, e))
            })?;

        if !status.success() {
            return Err(ScaffoldError::Installer(format!(
                "{} exited with {}",
                self.command_line(),
                status
            )));
        }
        Ok(())
    }
}
