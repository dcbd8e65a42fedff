use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::extractor;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub extractor: ExtractorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Shared secret expected in the `X-Api-Key` header (or as a bearer
    /// token) on every `/api` request. Override with `VIDGATE_API_KEY`.
    pub api_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            cors_allowed_origins: vec!["http://localhost:8081".to_string()],
            api_key: "change-me".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Path or name of the yt-dlp binary.
    pub binary: String,

    /// Netscape cookie jar passed to the extractor for sites that
    /// require authentication. Optional.
    pub cookies_file: Option<PathBuf>,

    /// Per-connection socket timeout forwarded to the extractor.
    pub socket_timeout_seconds: u64,

    /// Wall-clock budget for a single extraction, enforced on our side.
    pub request_timeout_seconds: u64,

    /// Container every resolved download is normalized to.
    pub merge_container: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: extractor::DEFAULT_BINARY.to_string(),
            cookies_file: None,
            socket_timeout_seconds: extractor::SOCKET_TIMEOUT_SECS,
            request_timeout_seconds: extractor::REQUEST_TIMEOUT_SECS,
            merge_container: extractor::MERGE_CONTAINER.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("vidgate").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".vidgate").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    /// Environment variables take precedence over the config file so the
    /// shared secret never has to live on disk.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(key) = get("VIDGATE_API_KEY") {
            self.server.api_key = key;
        }

        if let Some(origins) = get("VIDGATE_ALLOWED_ORIGINS") {
            self.server.cors_allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        if let Some(port) = get("VIDGATE_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
        }

        if let Some(path) = get("VIDGATE_COOKIES_FILE") {
            self.extractor.cookies_file = Some(PathBuf::from(path));
        }

        if let Some(level) = get("VIDGATE_LOG_LEVEL") {
            self.general.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.api_key.is_empty() {
            anyhow::bail!("API key cannot be empty; set server.api_key or VIDGATE_API_KEY");
        }

        if self.extractor.request_timeout_seconds == 0 {
            anyhow::bail!("Extractor request timeout must be > 0");
        }

        if self.extractor.merge_container.is_empty() {
            anyhow::bail!("Merge container cannot be empty");
        }

        Ok(())
    }
}
