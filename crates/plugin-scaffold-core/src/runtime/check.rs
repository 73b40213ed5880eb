//! Detection of the Node.js toolchain the generated project needs

use anyhow::Result;
use std::process::Command;

/// npm ships as a batch script on Windows
#[cfg(windows)]
pub(crate) const NPM_PROGRAM: &str = "npm.cmd";
#[cfg(not(windows))]
pub(crate) const NPM_PROGRAM: &str = "npm";

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

fn probe(program: &str, name: &'static str) -> RuntimeInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    probe("node", "Node.js")
}

/// Check if npm is available
pub fn check_npm() -> RuntimeInfo {
    probe(NPM_PROGRAM, "npm")
}

/// Check node and npm; fails listing whatever is missing.
pub fn check_toolchain() -> Result<Vec<RuntimeInfo>> {
    let results = vec![check_node(), check_npm()];

    let missing: Vec<_> = results
        .iter()
        .filter(|info| !info.available)
        .map(|info| format!("  - {} (install from https://nodejs.org)", info.name))
        .collect();
    if !missing.is_empty() {
        anyhow::bail!("Missing required runtimes:\n{}", missing.join("\n"));
    }

    Ok(results)
}
