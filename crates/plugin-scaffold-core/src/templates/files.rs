//! Post-copy file fixes: ignore-file rename and reverse-proxy config

use crate::config::ProjectConfig;
use crate::error::{Result, ScaffoldError};
use log::{debug, info, warn};
use tokio::fs;

/// Packaged name of the ignore file (package registries drop `.gitignore`)
pub const IGNORE_TEMPLATE: &str = "gitignore.template";
pub const IGNORE_FILE: &str = ".gitignore";

pub const PROXY_TEMPLATE: &str = "caddy.config.template";
pub const PROXY_CONFIG: &str = "caddy.config";

/// Substituted for `{{email}}` when no email was given
pub const DEFAULT_PROXY_EMAIL: &str = "your-email@example.com";

const DOMAIN_TOKEN: &str = "{{domain}}";
const PORT_TOKEN: &str = "{{port}}";
const EMAIL_TOKEN: &str = "{{email}}";

/// Applies file-identity fixes to a freshly copied tree
pub struct FileProcessor<'a> {
    config: &'a ProjectConfig,
}

impl<'a> FileProcessor<'a> {
    pub fn new(config: &'a ProjectConfig) -> Self {
        Self { config }
    }

    pub async fn process_all_files(&self) -> Result<()> {
        self.process_ignore_file().await?;
        self.process_proxy_template().await?;
        Ok(())
    }

    /// Rename `gitignore.template` to `.gitignore`. No-op when absent.
    pub async fn process_ignore_file(&self) -> Result<()> {
        let template = self.config.target_dir().join(IGNORE_TEMPLATE);
        if !template.is_file() {
            return Ok(());
        }
        let target = self.config.target_dir().join(IGNORE_FILE);
        fs::rename(&template, &target)
            .await
            .map_err(|e| ScaffoldError::io(&template, e))
    }

    /// Render `caddy.config` from its template when the proxy is enabled,
    /// otherwise drop the unused template.
    pub async fn process_proxy_template(&self) -> Result<()> {
        let template = self.config.target_dir().join(PROXY_TEMPLATE);
        let Some(proxy) = self.config.proxy() else {
            if template.is_file() {
                fs::remove_file(&template)
                    .await
                    .map_err(|e| ScaffoldError::io(&template, e))?;
                debug!("Removed unused {}", PROXY_TEMPLATE);
            }
            return Ok(());
        };

        if !template.is_file() {
            warn!("{} not found; proxy config was not generated", PROXY_TEMPLATE);
            return Ok(());
        }

        let content = fs::read_to_string(&template)
            .await
            .map_err(|e| ScaffoldError::io(&template, e))?;
        let rendered = render_proxy_config(
            &content,
            &proxy.domain,
            self.config.websocket_port(),
            proxy.email.as_deref(),
        );

        let target = self.config.target_dir().join(PROXY_CONFIG);
        fs::write(&target, rendered)
            .await
            .map_err(|e| ScaffoldError::io(&target, e))?;
        fs::remove_file(&template)
            .await
            .map_err(|e| ScaffoldError::io(&template, e))?;

        info!("Generated {} for {}", PROXY_CONFIG, proxy.domain);
        Ok(())
    }
}

/// Literal token substitution; user values are inserted verbatim
pub fn render_proxy_config(template: &str, domain: &str, port: u16, email: Option<&str>) -> String {
    template
        .replace(DOMAIN_TOKEN, domain)
        .replace(PORT_TOKEN, &port.to_string())
        .replace(EMAIL_TOKEN, email.unwrap_or(DEFAULT_PROXY_EMAIL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Framework, Language, ProjectDraft};
    use std::fs as std_fs;
    use tempfile::TempDir;

    const CADDY_TEMPLATE: &str = "{\n  email {{email}}\n}\n\n{{domain}} {\n  reverse_proxy localhost:{{port}}\n}\n";

    fn setup(use_proxy: bool, email: Option<&str>) -> (TempDir, ProjectConfig) {
        let work = TempDir::new().unwrap();
        let config = ProjectDraft {
            project_name: Some("my-plugin".to_string()),
            description: Some("desc".to_string()),
            framework: Some(Framework::Vanilla),
            language: Some(Language::JavaScript),
            websocket_port: Some(14000),
            use_proxy,
            proxy_domain: use_proxy.then(|| "dev.example.com".to_string()),
            proxy_email: email.map(str::to_string),
        }
        .validate(work.path())
        .unwrap();
        std_fs::create_dir_all(config.target_dir()).unwrap();
        (work, config)
    }

    #[test]
    fn test_render_proxy_config() {
        let rendered = render_proxy_config(CADDY_TEMPLATE, "dev.example.com", 13131, None);
        assert!(rendered.contains("email your-email@example.com"));
        assert!(rendered.contains("dev.example.com {"));
        assert!(rendered.contains("localhost:13131"));
        assert!(!rendered.contains("{{"));
    }

    #[tokio::test]
    async fn test_proxy_template_materialized() {
        let (_work, config) = setup(true, Some("me@example.com"));
        let target = config.target_dir();
        std_fs::write(target.join(PROXY_TEMPLATE), CADDY_TEMPLATE).unwrap();

        FileProcessor::new(&config).process_all_files().await.unwrap();

        let rendered = std_fs::read_to_string(target.join(PROXY_CONFIG)).unwrap();
        assert!(rendered.contains("email me@example.com"));
        assert!(rendered.contains("localhost:14000"));
        assert!(!target.join(PROXY_TEMPLATE).exists());
    }

    #[tokio::test]
    async fn test_proxy_disabled_drops_template() {
        let (_work, config) = setup(false, None);
        let target = config.target_dir();
        std_fs::write(target.join(PROXY_TEMPLATE), CADDY_TEMPLATE).unwrap();

        let processor = FileProcessor::new(&config);
        processor.process_all_files().await.unwrap();

        assert!(!target.join(PROXY_CONFIG).exists());
        assert!(!target.join(PROXY_TEMPLATE).exists());

        processor.process_proxy_template().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_proxy_template_is_soft() {
        let (_work, config) = setup(true, None);
        FileProcessor::new(&config)
            .process_proxy_template()
            .await
            .unwrap();
        assert!(!config.target_dir().join(PROXY_CONFIG).exists());
    }

    #[tokio::test]
    async fn test_ignore_file_renamed_once() {
        let (_work, config) = setup(false, None);
        let target = config.target_dir();
        std_fs::write(target.join(IGNORE_TEMPLATE), "node_modules\n").unwrap();

        let processor = FileProcessor::new(&config);
        processor.process_ignore_file().await.unwrap();
        processor.process_ignore_file().await.unwrap();

        assert_eq!(
            std_fs::read_to_string(target.join(IGNORE_FILE)).unwrap(),
            "node_modules\n"
        );
        assert!(!target.join(IGNORE_TEMPLATE).exists());
    }
}
