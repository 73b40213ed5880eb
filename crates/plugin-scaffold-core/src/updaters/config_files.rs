//! Token and pattern edits of generated text files

use crate::config::ProjectConfig;
use crate::error::{Result, ScaffoldError};
use crate::templates::composer::SCRIPTS_DIR;
use log::{debug, info, warn};
use regex::{Captures, NoExpand, Regex};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::fs;

pub const README_FILE: &str = "README.md";
pub const CONSTANTS_FILE: &str = "src/constants.js";
pub const DEV_SERVER_FILE: &str = "dev-server.js";

const PROJECT_NAME_TOKEN: &str = "${PROJECT_NAME}";
const FILE_NAME_TOKEN: &str = "${FILE_NAME}";

/// Marker of the proxy options already being present in the bundler config
const PROXY_OPTION_MARKER: &str = "useCaddy: true";

fn dev_server_port_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"const DEFAULT_PORT = \d+;").expect("valid regex"))
}

fn bundler_port_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"defaultPort: \d+,").expect("valid regex"))
}

/// Dev-mode plugin call up to and including its `outputFilePath` option
fn devmode_anchor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(vitePluginDevMode\(\{[\s\S]*?outputFilePath: path\.resolve\(__dirname, 'src/core/dev-reload\.js'\),)",
        )
        .expect("valid regex")
    })
}

/// Rewrites README, constants, dev server and bundler config
pub struct ConfigFileUpdater<'a> {
    config: &'a ProjectConfig,
}

impl<'a> ConfigFileUpdater<'a> {
    pub fn new(config: &'a ProjectConfig) -> Self {
        Self { config }
    }

    fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.config.target_dir().join(relative)
    }

    pub async fn update_all(&self) -> Result<()> {
        self.update_readme().await?;
        self.update_constants().await?;
        self.update_dev_server_port().await?;
        self.update_bundler_config().await?;
        Ok(())
    }

    pub async fn update_readme(&self) -> Result<()> {
        let path = self.path(README_FILE);
        let content = read_required(&path).await?;
        let updated = render_readme(&content, self.config.project_name());
        write(&path, updated).await?;
        debug!("Updated {}", README_FILE);
        Ok(())
    }

    pub async fn update_constants(&self) -> Result<()> {
        let path = self.path(CONSTANTS_FILE);
        let content = read_required(&path).await?;
        let updated = content.replace(PROJECT_NAME_TOKEN, self.config.project_name());
        write(&path, updated).await?;
        debug!("Updated {}", CONSTANTS_FILE);
        Ok(())
    }

    pub async fn update_dev_server_port(&self) -> Result<()> {
        let relative = Path::new(SCRIPTS_DIR).join(DEV_SERVER_FILE);
        let path = self.path(&relative);
        let Some(content) = read_optional(&path).await? else {
            warn!("{} not found; dev server port not set", relative.display());
            return Ok(());
        };
        write(&path, set_dev_server_port(&content, self.config.websocket_port())).await?;
        info!("Dev server port set to {}", self.config.websocket_port());
        Ok(())
    }

    pub async fn update_bundler_config(&self) -> Result<()> {
        let file_name = self.config.bundler().config_file_name();
        let path = self.path(&file_name);
        let Some(content) = read_optional(&path).await? else {
            warn!("{} not found; bundler config not updated", file_name);
            return Ok(());
        };

        let mut updated = set_bundler_port(&content, self.config.websocket_port());
        if let Some(proxy) = self.config.proxy() {
            match splice_proxy_options(&updated, &proxy.domain) {
                Some(spliced) => updated = spliced,
                None => warn!(
                    "Dev-mode plugin options not found in {}; proxy settings not added",
                    file_name
                ),
            }
        }

        write(&path, updated).await?;
        info!("Updated {}", file_name);
        Ok(())
    }
}

async fn read_required(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| ScaffoldError::io(path, e))
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    read_required(path).await.map(Some)
}

async fn write(path: &Path, content: String) -> Result<()> {
    fs::write(path, content)
        .await
        .map_err(|e| ScaffoldError::io(path, e))
}

/// Replace every `${PROJECT_NAME}` and `${FILE_NAME}` occurrence
pub fn render_readme(content: &str, project_name: &str) -> String {
    content
        .replace(PROJECT_NAME_TOKEN, project_name)
        .replace(FILE_NAME_TOKEN, project_name)
}

/// Rewrite the first `const DEFAULT_PORT = N;`
pub fn set_dev_server_port(content: &str, port: u16) -> String {
    let replacement = format!("const DEFAULT_PORT = {};", port);
    dev_server_port_re()
        .replacen(content, 1, NoExpand(&replacement))
        .into_owned()
}

/// Rewrite the first `defaultPort: N,`
pub fn set_bundler_port(content: &str, port: u16) -> String {
    let replacement = format!("defaultPort: {},", port);
    bundler_port_re()
        .replacen(content, 1, NoExpand(&replacement))
        .into_owned()
}

/// Insert `useCaddy` and `caddyDomain` after the dev-mode plugin's
/// `outputFilePath` option.
///
/// Returns `None` when the anchor is absent. Content that already carries the
/// options is returned unchanged.
pub fn splice_proxy_options(content: &str, domain: &str) -> Option<String> {
    let anchor = devmode_anchor_re();
    let found = anchor.find(content)?;
    if content[found.end()..].trim_start().starts_with(PROXY_OPTION_MARKER) {
        return Some(content.to_string());
    }

    let spliced = anchor.replacen(content, 1, |caps: &Captures| {
        format!(
            "{}\n      useCaddy: true,\n      caddyDomain: '{}',",
            &caps[1], domain
        )
    });
    Some(spliced.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Framework, Language, ProjectDraft};
    use std::fs as std_fs;
    use tempfile::TempDir;

    const VITE_CONFIG: &str = r#"export default defineConfig({
  plugins: [
    vitePluginArgs({
      defaultPort: 13131,
    }),
    vitePluginDevMode({
      enabled: isDev,
      outputFilePath: path.resolve(__dirname, 'src/core/dev-reload.js'),
    }),
  ],
});
"#;

    fn setup(use_proxy: bool) -> (TempDir, ProjectConfig) {
        let work = TempDir::new().unwrap();
        let config = ProjectDraft {
            project_name: Some("my-plugin".to_string()),
            description: Some("desc".to_string()),
            framework: Some(Framework::Vanilla),
            language: Some(Language::JavaScript),
            websocket_port: Some(15000),
            use_proxy,
            proxy_domain: use_proxy.then(|| "dev.example.com".to_string()),
            proxy_email: None,
        }
        .validate(work.path())
        .unwrap();
        let target = config.target_dir();
        std_fs::create_dir_all(target.join("src")).unwrap();
        std_fs::create_dir_all(target.join(SCRIPTS_DIR)).unwrap();
        std_fs::write(target.join(README_FILE), "# ${PROJECT_NAME}\n\ndist/${FILE_NAME}.js\n${PROJECT_NAME}\n").unwrap();
        std_fs::write(
            target.join(CONSTANTS_FILE),
            "export const PLUGIN_NAME = '${PROJECT_NAME}';\n",
        )
        .unwrap();
        (work, config)
    }

    #[test]
    fn test_render_readme_replaces_every_occurrence() {
        let out = render_readme("${PROJECT_NAME} ${FILE_NAME} ${PROJECT_NAME}", "x-y");
        assert_eq!(out, "x-y x-y x-y");
    }

    #[tokio::test]
    async fn test_substitution_twice_is_a_no_op() {
        let once = render_readme("# ${PROJECT_NAME}\n${FILE_NAME}\n", "x-y");
        assert_eq!(render_readme(&once, "x-y"), once);
        assert_eq!(render_readme("no tokens", "x-y"), "no tokens");

        let (_work, config) = setup(false);
        let target = config.target_dir();
        let updater = ConfigFileUpdater::new(&config);
        updater.update_readme().await.unwrap();
        updater.update_constants().await.unwrap();
        let readme = std_fs::read_to_string(target.join(README_FILE)).unwrap();
        let constants = std_fs::read_to_string(target.join(CONSTANTS_FILE)).unwrap();

        updater.update_readme().await.unwrap();
        updater.update_constants().await.unwrap();
        assert_eq!(std_fs::read_to_string(target.join(README_FILE)).unwrap(), readme);
        assert_eq!(
            std_fs::read_to_string(target.join(CONSTANTS_FILE)).unwrap(),
            constants
        );
    }

    #[test]
    fn test_port_rewrites() {
        let server = "const DEFAULT_PORT = 13131;\nconst OTHER = 1;\n";
        assert_eq!(
            set_dev_server_port(server, 2048),
            "const DEFAULT_PORT = 2048;\nconst OTHER = 1;\n"
        );

        let updated = set_bundler_port(VITE_CONFIG, 2048);
        assert!(updated.contains("defaultPort: 2048,"));
        assert!(!updated.contains("13131"));

        assert_eq!(set_bundler_port("no port here", 2048), "no port here");
    }

    #[test]
    fn test_splice_proxy_options() {
        let spliced = splice_proxy_options(VITE_CONFIG, "dev.example.com").unwrap();
        assert!(spliced.contains(
            "'src/core/dev-reload.js'),\n      useCaddy: true,\n      caddyDomain: 'dev.example.com',\n    }),"
        ));

        let again = splice_proxy_options(&spliced, "dev.example.com").unwrap();
        assert_eq!(again, spliced);
        assert_eq!(again.matches(PROXY_OPTION_MARKER).count(), 1);
    }

    #[test]
    fn test_splice_without_anchor() {
        assert!(splice_proxy_options("export default {};", "dev.example.com").is_none());
    }

    #[tokio::test]
    async fn test_update_all() {
        let (_work, config) = setup(true);
        let target = config.target_dir();
        std_fs::write(
            target.join(SCRIPTS_DIR).join(DEV_SERVER_FILE),
            "const DEFAULT_PORT = 13131;\n",
        )
        .unwrap();
        std_fs::write(target.join("vite.config.js"), VITE_CONFIG).unwrap();

        ConfigFileUpdater::new(&config).update_all().await.unwrap();

        assert_eq!(
            std_fs::read_to_string(target.join(README_FILE)).unwrap(),
            "# my-plugin\n\ndist/my-plugin.js\nmy-plugin\n"
        );
        assert_eq!(
            std_fs::read_to_string(target.join(CONSTANTS_FILE)).unwrap(),
            "export const PLUGIN_NAME = 'my-plugin';\n"
        );
        assert_eq!(
            std_fs::read_to_string(target.join("scripts/dev-server.js")).unwrap(),
            "const DEFAULT_PORT = 15000;\n"
        );
        let vite = std_fs::read_to_string(target.join("vite.config.js")).unwrap();
        assert!(vite.contains("defaultPort: 15000,"));
        assert!(vite.contains("caddyDomain: 'dev.example.com',"));
    }

    #[tokio::test]
    async fn test_optional_files_are_soft() {
        let (_work, config) = setup(false);
        ConfigFileUpdater::new(&config).update_all().await.unwrap();
        assert!(!config.target_dir().join("vite.config.js").exists());
    }

    #[tokio::test]
    async fn test_missing_readme_is_hard_error() {
        let (_work, config) = setup(false);
        std_fs::remove_file(config.target_dir().join(README_FILE)).unwrap();

        let err = ConfigFileUpdater::new(&config).update_all().await.unwrap_err();
        assert!(matches!(err, ScaffoldError::Io { .. }));
    }
}
