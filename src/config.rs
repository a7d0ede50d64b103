use crate::controller::Canvas;
use crate::fs::{FileSystem, default_fs};
use crate::layout::ClusterPackView;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const CONFIG_FILE: &str = ".ringlens.toml";
pub const API_URL_ENV: &str = "RINGLENS_API_URL";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8001";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid API base URL '{0}': expected http(s)://host[:port][/path]")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api: ApiSettings,
    pub health: HealthSettings,
    pub layout: LayoutSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    /// No trailing slash; endpoint paths are appended to it.
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthSettings {
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    api: Option<RawApi>,
    health: Option<RawHealth>,
    layout: Option<RawLayout>,
}

#[derive(Debug, Deserialize)]
struct RawApi {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawHealth {
    poll_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawLayout {
    width: Option<f64>,
    height: Option<f64>,
    padding: Option<f64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
        }
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let canvas = Canvas::default();
        Self {
            width: canvas.width,
            height: canvas.height,
            padding: canvas.padding,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            health: HealthSettings::default(),
            layout: LayoutSettings::default(),
        }
    }
}

impl LayoutSettings {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
            padding: self.padding,
        }
    }
}

impl Config {
    /// Load `.ringlens.toml` from `dir`, or defaults when there is none.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        Self::load_with_fs(dir, default_fs())
    }

    pub fn load_with_fs(dir: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);
        if !fs.exists(&config_path) {
            return Ok(Self::default());
        }
        let bytes = fs.read(&config_path)?;
        Self::from_toml(&String::from_utf8_lossy(&bytes))
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let api = match raw.api {
            Some(a) => ApiSettings {
                base_url: match a.base_url {
                    Some(url) => normalize_base_url(&url)?,
                    None => defaults.api.base_url,
                },
                timeout: a
                    .timeout_secs
                    .map_or(defaults.api.timeout, Duration::from_secs),
            },
            None => defaults.api,
        };

        let health = match raw.health {
            Some(h) => HealthSettings {
                poll_interval: h
                    .poll_interval_secs
                    .filter(|&s| s > 0)
                    .map_or(defaults.health.poll_interval, Duration::from_secs),
            },
            None => defaults.health,
        };

        let layout = match raw.layout {
            Some(l) => {
                let width = l.width.unwrap_or(defaults.layout.width);
                LayoutSettings {
                    width,
                    height: l
                        .height
                        .unwrap_or_else(|| ClusterPackView::default_height(width)),
                    padding: l.padding.unwrap_or(defaults.layout.padding),
                }
            }
            None => defaults.layout,
        };

        Ok(Self {
            api,
            health,
            layout,
        })
    }

    /// Apply `RINGLENS_API_URL` and then the `--api-url` flag, in that order of precedence.
    pub fn with_overrides(
        mut self,
        env_url: Option<&str>,
        cli_url: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = cli_url.or(env_url).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = normalize_base_url(url)?;
        }
        Ok(self)
    }
}

/// Validate an http(s) base URL and trim any trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

pub fn generate_config_template() -> String {
    format!(
        r#"# ringlens configuration

[api]
# Detection backend, either deployed or a local dev proxy.
base_url = "{DEFAULT_BASE_URL}"
timeout_secs = 30

[health]
# Seconds between /health polls while the dashboard is open.
poll_interval_secs = 10

[layout]
# Canvas size for the cluster pack and network views.
width = 960.0
# height = 672.0   # defaults to max(500, width * 0.7)
padding = 12.0
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;

    #[test]
    fn test_missing_file_uses_defaults() {
        let fs = MockFs::new();
        let config = Config::load_with_fs(Path::new("/project"), &fs).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_partial_file_folds_onto_defaults() {
        let config = Config::from_toml(
            r#"
            [api]
            base_url = "https://risk.example.com/api/"
            [layout]
            width = 600.0
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://risk.example.com/api");
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(config.layout.height, 500.0);
        assert_eq!(config.health.poll_interval, Duration::from_secs(10));
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config = Config::from_toml(&generate_config_template()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_flag_beats_env() {
        let config = Config::default()
            .with_overrides(Some("http://env:9000"), Some("http://flag:9001/"))
            .unwrap();
        assert_eq!(config.api.base_url, "http://flag:9001");

        let config = Config::default()
            .with_overrides(Some("http://env:9000"), None)
            .unwrap();
        assert_eq!(config.api.base_url, "http://env:9000");
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(matches!(
            normalize_base_url("ftp://host"),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            normalize_base_url("localhost:8001"),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            Config::from_toml("[api]\nbase_url = \"nope\""),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        assert!(matches!(
            Config::from_toml("[api"),
            Err(ConfigError::Parse(_))
        ));
    }
}
