//! npm registry lookup for project-name availability

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Summary of a published package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PackageDocument {
    name: String,
    #[serde(default, rename = "dist-tags")]
    dist_tags: HashMap<String, String>,
    description: Option<String>,
    author: Option<Person>,
    #[serde(default)]
    maintainers: Vec<Person>,
}

/// npm accepts both `"Name <mail>"` strings and `{ "name": ... }` objects
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Person {
    Text(String),
    Object { name: Option<String> },
}

impl Person {
    fn name(&self) -> Option<String> {
        match self {
            Person::Text(text) => Some(text.clone()),
            Person::Object { name } => name.clone(),
        }
    }
}

impl From<PackageDocument> for PackageInfo {
    fn from(doc: PackageDocument) -> Self {
        let author = doc
            .author
            .as_ref()
            .and_then(Person::name)
            .or_else(|| doc.maintainers.first().and_then(Person::name));
        Self {
            version: doc.dist_tags.get("latest").cloned(),
            name: doc.name,
            description: doc.description,
            author,
        }
    }
}

/// Read-only client for the package registry
pub struct RegistryClient {
    base_url: Url,
    client: reqwest::Client,
}

impl RegistryClient {
    /// Client for the public npm registry
    pub fn new() -> Self {
        let base_url = Url::parse(DEFAULT_REGISTRY_URL).expect("default registry URL is valid");
        Self::from_url(base_url)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let url =
            Url::parse(base_url).with_context(|| format!("Invalid registry URL: {}", base_url))?;
        Ok(Self::from_url(url))
    }

    fn from_url(base_url: Url) -> Self {
        Self {
            base_url,
            client: reqwest::Client::builder()
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// `<base>/<name>`, with the name as a single encoded segment
    fn package_url(&self, name: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", self.base_url))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    /// True only on HTTP 200. Network failures count as "not published".
    pub async fn package_exists(&self, name: &str) -> bool {
        match self.fetch(name).await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                warn!("Registry check for {} failed: {:#}", name, e);
                false
            }
        }
    }

    /// Metadata of a published package, `None` when absent or unreachable
    pub async fn package_info(&self, name: &str) -> Option<PackageInfo> {
        let response = match self.fetch(name).await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!("Registry returned {} for {}", response.status(), name);
                return None;
            }
            Err(e) => {
                warn!("Registry lookup for {} failed: {:#}", name, e);
                return None;
            }
        };

        match response.json::<PackageDocument>().await {
            Ok(doc) => Some(doc.into()),
            Err(e) => {
                warn!("Unexpected registry response for {}: {}", name, e);
                None
            }
        }
    }

    async fn fetch(&self, name: &str) -> Result<reqwest::Response> {
        let url = self.package_url(name)?;
        self.client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new()
    }
}
