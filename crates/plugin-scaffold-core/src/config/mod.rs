//! Project configuration: the choices a generation run is made of
//!
//! A [`ProjectDraft`] may be half-filled while prompts are still running.
//! Only [`ProjectDraft::validate`] produces a [`ProjectConfig`], and the
//! pipeline never accepts anything else.

pub mod validate;

use crate::error::ConfigError;
use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

/// WebSocket port used by the generated hot-reload dev server
pub const DEFAULT_WEBSOCKET_PORT: u16 = 13131;

/// Lowest port the dev server may bind to
pub const MIN_WEBSOCKET_PORT: u16 = 1024;

/// UI framework of the generated plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Framework {
    Vanilla,
    React,
    Svelte,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Vanilla => "vanilla",
            Framework::React => "react",
            Framework::Svelte => "svelte",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::Vanilla => "Vanilla JavaScript",
            Framework::React => "React",
            Framework::Svelte => "Svelte",
        }
    }

    /// Whether templates exist for this framework yet
    pub fn is_available(&self) -> bool {
        !matches!(self, Framework::Svelte)
    }

    /// The framework every other framework layers on top of
    pub fn is_baseline(&self) -> bool {
        matches!(self, Framework::Vanilla)
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source language of the generated plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Language {
    #[value(name = "javascript", alias = "js")]
    JavaScript,
    #[value(name = "typescript", alias = "ts")]
    TypeScript,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
        }
    }

    /// Short code used as a path segment in the template layout
    pub fn code(&self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::TypeScript => "ts",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Language::JavaScript)
    }

    pub fn is_baseline(&self) -> bool {
        matches!(self, Language::JavaScript)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bundler of the generated plugin. Derived from the framework, never chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bundler {
    Vite,
}

impl Bundler {
    /// Bundlers whose config files may appear in a template tree
    pub const KNOWN_NAMES: &'static [&'static str] = &["vite", "webpack"];

    pub fn for_framework(_framework: Framework) -> Self {
        Bundler::Vite
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bundler::Vite => "vite",
        }
    }

    /// Plugin files this bundler needs under `scripts/`
    pub fn plugin_file_names(&self) -> &'static [&'static str] {
        match self {
            Bundler::Vite => &["vite-plugin-args.js", "vite-plugin-devmode.js"],
        }
    }

    /// Canonical config file name inside the generated project
    pub fn config_file_name(&self) -> String {
        format!("{}.config.js", self.as_str())
    }
}

impl fmt::Display for Bundler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Partially collected configuration.
///
/// Every field may be missing; nothing here is checked until
/// [`ProjectDraft::validate`] runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub framework: Option<Framework>,
    pub language: Option<Language>,
    /// Falls back to [`DEFAULT_WEBSOCKET_PORT`] when unset
    pub websocket_port: Option<u16>,
    pub use_proxy: bool,
    pub proxy_domain: Option<String>,
    pub proxy_email: Option<String>,
}

impl ProjectDraft {
    /// Check every field and freeze the draft into a [`ProjectConfig`].
    ///
    /// `base_dir` is the directory the project folder is created in; the
    /// target path is `base_dir/<project_name>`.
    pub fn validate(&self, base_dir: &Path) -> Result<ProjectConfig, ConfigError> {
        let project_name = non_blank(&self.project_name).ok_or(ConfigError::MissingProjectName)?;
        if !validate::is_valid_kebab_case(project_name) {
            return Err(ConfigError::InvalidProjectName(project_name.to_string()));
        }

        let description = non_blank(&self.description).ok_or(ConfigError::MissingDescription)?;
        let framework = self.framework.ok_or(ConfigError::MissingFramework)?;
        let language = self.language.ok_or(ConfigError::MissingLanguage)?;

        let websocket_port = self.websocket_port.unwrap_or(DEFAULT_WEBSOCKET_PORT);
        if !validate::is_valid_port(websocket_port) {
            return Err(ConfigError::PortOutOfRange(websocket_port));
        }

        let proxy = if self.use_proxy {
            let domain = non_blank(&self.proxy_domain).ok_or(ConfigError::MissingProxyDomain)?;
            Some(ProxySettings {
                domain: domain.to_string(),
                email: non_blank(&self.proxy_email).map(str::to_string),
            })
        } else {
            None
        };

        Ok(ProjectConfig {
            project_name: project_name.to_string(),
            description: description.to_string(),
            target_dir: base_dir.join(project_name),
            framework,
            language,
            bundler: Bundler::for_framework(framework),
            websocket_port,
            proxy,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Reverse proxy (Caddy) options, present only when the proxy is enabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub domain: String,
    pub email: Option<String>,
}

/// A validated, read-only configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    project_name: String,
    description: String,
    target_dir: PathBuf,
    framework: Framework,
    language: Language,
    bundler: Bundler,
    websocket_port: u16,
    proxy: Option<ProxySettings>,
}

impl ProjectConfig {
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn framework(&self) -> Framework {
        self.framework
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn bundler(&self) -> Bundler {
        self.bundler
    }

    pub fn websocket_port(&self) -> u16 {
        self.websocket_port
    }

    pub fn proxy(&self) -> Option<&ProxySettings> {
        self.proxy.as_ref()
    }

    pub fn use_proxy(&self) -> bool {
        self.proxy.is_some()
    }

    /// Bundle file name the plugin is built to, e.g. `dist/my-plugin.js`
    pub fn output_file(&self) -> String {
        format!("dist/{}.js", self.project_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProjectDraft {
        ProjectDraft {
            project_name: Some("my-plugin".to_string()),
            description: Some("My Plugin for RISU AI".to_string()),
            framework: Some(Framework::Vanilla),
            language: Some(Language::JavaScript),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_fills_derived_fields() {
        let config = draft().validate(Path::new("/work")).unwrap();

        assert_eq!(config.target_dir(), Path::new("/work/my-plugin"));
        assert_eq!(config.bundler(), Bundler::Vite);
        assert_eq!(config.websocket_port(), DEFAULT_WEBSOCKET_PORT);
        assert_eq!(config.output_file(), "dist/my-plugin.js");
        assert!(!config.use_proxy());
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let base = Path::new("/work");

        let mut d = draft();
        d.project_name = Some("  ".to_string());
        assert_eq!(d.validate(base), Err(ConfigError::MissingProjectName));

        let mut d = draft();
        d.description = None;
        assert_eq!(d.validate(base), Err(ConfigError::MissingDescription));

        let mut d = draft();
        d.framework = None;
        assert_eq!(d.validate(base), Err(ConfigError::MissingFramework));

        let mut d = draft();
        d.language = None;
        assert_eq!(d.validate(base), Err(ConfigError::MissingLanguage));
    }

    #[test]
    fn test_validate_rejects_bad_name_and_port() {
        let base = Path::new("/work");

        let mut d = draft();
        d.project_name = Some("My_Plugin".to_string());
        assert_eq!(
            d.validate(base),
            Err(ConfigError::InvalidProjectName("My_Plugin".to_string()))
        );

        let mut d = draft();
        d.websocket_port = Some(80);
        assert_eq!(d.validate(base), Err(ConfigError::PortOutOfRange(80)));
    }

    #[test]
    fn test_proxy_requires_domain() {
        let base = Path::new("/work");

        let mut d = draft();
        d.use_proxy = true;
        assert_eq!(d.validate(base), Err(ConfigError::MissingProxyDomain));

        d.proxy_domain = Some("dev.example.com".to_string());
        d.proxy_email = Some(String::new());
        let config = d.validate(base).unwrap();
        let proxy = config.proxy().unwrap();
        assert_eq!(proxy.domain, "dev.example.com");
        assert_eq!(proxy.email, None);
    }

    #[test]
    fn test_proxy_fields_ignored_when_disabled() {
        let mut d = draft();
        d.proxy_domain = Some("dev.example.com".to_string());
        let config = d.validate(Path::new("/work")).unwrap();
        assert!(config.proxy().is_none());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::JavaScript.code(), "js");
        assert_eq!(Language::TypeScript.code(), "ts");
        assert!(Framework::Vanilla.is_available());
        assert!(!Framework::Svelte.is_available());
        assert!(!Language::TypeScript.is_available());
    }
}
