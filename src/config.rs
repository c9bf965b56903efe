use crate::properties::write_atomic;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "i18n-manager";
pub const CONFIG_FILE: &str = "config.json";

/// Overrides the directory holding `config.json`
pub const CONFIG_DIR_ENV: &str = "I18N_MANAGER_CONFIG_DIR";

/// Overrides the stored API key
pub const API_KEY_ENV: &str = "I18N_MANAGER_API_KEY";

const DEFAULT_PROVIDER: &str = "deepseek";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for one OpenAI-compatible provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl ProviderSettings {
    fn builtin(base_url: &str, model: &str) -> Self {
        Self {
            api_key: String::new(),
            base_url: base_url.to_string(),
            model: model.to_string(),
        }
    }
}

fn builtin_providers() -> BTreeMap<String, ProviderSettings> {
    BTreeMap::from([
        (
            "deepseek".to_string(),
            ProviderSettings::builtin("https://api.deepseek.com", "deepseek-chat"),
        ),
        (
            "qwen".to_string(),
            ProviderSettings::builtin(
                "https://dashscope.aliyuncs.com/compatible-mode/v1",
                "qwen-plus",
            ),
        ),
        (
            "openai".to_string(),
            ProviderSettings::builtin("https://api.openai.com/v1", "gpt-4o-mini"),
        ),
    ])
}

/// Per-user configuration, stored as JSON.
///
/// Loaded once in `main` and passed by value to whatever needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Properties directory used when `--path` is not given
    pub default_path: String,

    /// Name of the active entry in `ai_providers`
    pub ai_provider: String,

    pub ai_providers: BTreeMap<String, ProviderSettings>,

    /// Timeout for a single translation request
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_path: ".".to_string(),
            ai_provider: DEFAULT_PROVIDER.to_string(),
            ai_providers: builtin_providers(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Directory holding the config file.
///
/// `I18N_MANAGER_CONFIG_DIR` wins over the platform config directory.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

impl Config {
    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config '{}'", path.display()))?;
        config.fill_defaults();
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<()> {
        let Some(path) = config_path() else {
            bail!("Could not determine the user configuration directory; set {}", CONFIG_DIR_ENV);
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        write_atomic(path, &content)
            .with_context(|| format!("Failed to write config '{}'", path.display()))
    }

    /// Restore built-in providers and blank fields lost from older files.
    fn fill_defaults(&mut self) {
        for (name, builtin) in builtin_providers() {
            let entry = self.ai_providers.entry(name).or_default();
            if entry.base_url.is_empty() {
                entry.base_url = builtin.base_url;
            }
            if entry.model.is_empty() {
                entry.model = builtin.model;
            }
        }
        if self.ai_provider.is_empty() {
            self.ai_provider = DEFAULT_PROVIDER.to_string();
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
    }

    /// Settings of the active provider.
    pub fn provider(&self) -> Result<&ProviderSettings> {
        self.ai_providers
            .get(&self.ai_provider)
            .with_context(|| format!("Unknown AI provider '{}'", self.ai_provider))
    }

    fn provider_mut(&mut self) -> Result<&mut ProviderSettings> {
        let name = self.ai_provider.clone();
        self.ai_providers
            .get_mut(&name)
            .with_context(|| format!("Unknown AI provider '{}'", name))
    }

    /// Stored API key of the active provider, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.provider()
            .ok()
            .map(|p| p.api_key.as_str())
            .filter(|key| !key.is_empty())
    }

    /// API key to use: command line, then environment, then stored.
    pub fn resolve_api_key(&self, cli_key: Option<&str>) -> Option<String> {
        cli_key
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty()))
            .or_else(|| self.api_key().map(str::to_string))
    }

    /// Properties directory to use: command line, then `default_path`.
    pub fn resolve_base_path(&self, cli_path: Option<&Path>) -> PathBuf {
        cli_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.default_path))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn set_api_key(&mut self, api_key: &str) -> Result<()> {
        self.provider_mut()?.api_key = api_key.trim().to_string();
        Ok(())
    }

    pub fn set_provider(&mut self, name: &str) -> Result<()> {
        if !self.ai_providers.contains_key(name) {
            let known: Vec<_> = self.ai_providers.keys().map(String::as_str).collect();
            bail!(
                "Unsupported AI provider '{}', expected one of: {}",
                name,
                known.join(", ")
            );
        }
        self.ai_provider = name.to_string();
        Ok(())
    }

    pub fn set_model(&mut self, model: &str) -> Result<()> {
        self.provider_mut()?.model = model.trim().to_string();
        Ok(())
    }

    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            bail!("Base URL must start with http:// or https://, got '{}'", base_url);
        }
        self.provider_mut()?.base_url = base_url.to_string();
        Ok(())
    }

    pub fn set_default_path(&mut self, path: &str) {
        self.default_path = path.to_string();
    }

    /// API key for display: only the last four characters are shown.
    pub fn masked_api_key(&self) -> String {
        match self.api_key() {
            Some(key) => {
                let tail: String = key
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("********{}", tail)
            }
            None => "(not set)".to_string(),
        }
    }
}
