use std::collections::HashMap;
use std::fs;
use std::path::Path;
use anyhow::{Result, Context as AnyhowContext, anyhow};
use serde::{Serialize, Deserialize};

pub const GITEE_PROVIDER: &str = "gitee.com";
pub const GITEE_TOKEN_KEY: &str = "ACCESS_TOKEN";
pub const DEFAULT_GITEE_API_BASE: &str = "https://gitee.com/api/v5";
pub const DEFAULT_POSTIMAGE_URL: &str = "https://postimages.org/";

/// Source of API secrets keyed by `(provider, key_name)`.
pub trait ApiKeyProvider: Send + Sync {
    fn get_api_key(&self, provider: &str, key_name: &str) -> Option<String>;
}

/// On-disk configuration.
///
/// ```yaml
/// api_keys:
///   gitee.com:
///     ACCESS_TOKEN: "..."
/// gitee:
///   api_base: "https://gitee.com/api/v5"
/// browser:
///   executable: "/usr/bin/chromium"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub api_keys: HashMap<String, HashMap<String, String>>,
    #[serde(default)]
    pub gitee: GiteeSettings,
    #[serde(default)]
    pub postimage: PostImageSettings,
    #[serde(default)]
    pub browser: BrowserSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GiteeSettings {
    #[serde(default = "default_gitee_api_base")]
    pub api_base: String,
}

impl Default for GiteeSettings {
    fn default() -> Self {
        Self { api_base: default_gitee_api_base() }
    }
}

fn default_gitee_api_base() -> String {
    DEFAULT_GITEE_API_BASE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostImageSettings {
    #[serde(default = "default_postimage_url")]
    pub upload_url: String,
}

impl Default for PostImageSettings {
    fn default() -> Self {
        Self { upload_url: default_postimage_url() }
    }
}

fn default_postimage_url() -> String {
    DEFAULT_POSTIMAGE_URL.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BrowserSettings {
    /// Chromium binary; autodetected when absent.
    pub executable: Option<String>,
}

impl AppConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to deserialize config YAML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file from {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

impl ApiKeyProvider for AppConfig {
    fn get_api_key(&self, provider: &str, key_name: &str) -> Option<String> {
        self.api_keys
            .get(provider)
            .and_then(|keys| keys.get(key_name))
            .filter(|v| !v.is_empty())
            .cloned()
    }
}

/// Reads `IMGDROP_<PROVIDER>_<KEY_NAME>` from the process environment,
/// e.g. `IMGDROP_GITEE_COM_ACCESS_TOKEN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvKeyProvider;

impl EnvKeyProvider {
    pub fn var_name(provider: &str, key_name: &str) -> String {
        let sanitize = |s: &str| -> String {
            s.chars()
                .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
                .collect()
        };
        format!("IMGDROP_{}_{}", sanitize(provider), sanitize(key_name))
    }
}

impl ApiKeyProvider for EnvKeyProvider {
    fn get_api_key(&self, provider: &str, key_name: &str) -> Option<String> {
        std::env::var(Self::var_name(provider, key_name))
            .ok()
            .filter(|v| !v.is_empty())
    }
}

/// Tries each provider in turn.
pub struct ChainedKeyProvider {
    providers: Vec<Box<dyn ApiKeyProvider>>,
}

impl ChainedKeyProvider {
    pub fn new(providers: Vec<Box<dyn ApiKeyProvider>>) -> Self {
        Self { providers }
    }
}

impl ApiKeyProvider for ChainedKeyProvider {
    fn get_api_key(&self, provider: &str, key_name: &str) -> Option<String> {
        self.providers.iter().find_map(|p| p.get_api_key(provider, key_name))
    }
}

/// Resolves a secret that must exist before any node can be built.
pub fn require_api_key(keys: &dyn ApiKeyProvider, provider: &str, key_name: &str) -> Result<String> {
    keys.get_api_key(provider, key_name)
        .ok_or_else(|| anyhow!("API key {} for provider {} is not configured", key_name, provider))
}
