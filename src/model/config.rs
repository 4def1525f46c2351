use std::fs;
use std::path::Path;

use serde::Deserialize;
use url::Url;

const ENV_API_BASE_URL: &str = "CONSULTAS_API_BASE_URL";
const ENV_LIVE_VIEW_URL: &str = "CONSULTAS_LIVE_VIEW_URL";
const ENV_CONFIG_PATH: &str = "CONSULTAS_CONFIG_PATH";

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_API_BASE_URL: &str = "http://18.217.24.122:3000";

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub live_view_url: Option<String>,
}

/// Application configuration
///
/// Built once at startup and injected into clients and workflows; nothing
/// downstream reads the environment directly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the consultation backend.
    pub api_base_url: Url,
    /// Remote visual session of the automation in progress. `None` disables
    /// the live-view side channel.
    pub live_view_url: Option<Url>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL)
                .expect("default base URL is valid"),
            live_view_url: None,
        }
    }
}

impl Config {
    /// Load configuration from environment and config file.
    ///
    /// Resolution order for each value:
    /// 1. `CONSULTAS_API_BASE_URL` / `CONSULTAS_LIVE_VIEW_URL` environment
    ///    variables
    /// 2. YAML config file (`CONSULTAS_CONFIG_PATH`, default `config.yaml`)
    /// 3. Hardcoded default backend host (live view defaults to disabled)
    pub fn from_env() -> Self {
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = Self::load_config_file(&config_path).unwrap_or_default();

        let api_base_url = std::env::var(ENV_API_BASE_URL)
            .ok()
            .or(file.api_base_url)
            .and_then(|raw| parse_url_or_warn(&raw, "api_base_url"))
            .unwrap_or_else(|| Config::default().api_base_url);

        let live_view_url = std::env::var(ENV_LIVE_VIEW_URL)
            .ok()
            .or(file.live_view_url)
            .and_then(|raw| parse_url_or_warn(&raw, "live_view_url"));

        Self {
            api_base_url,
            live_view_url,
        }
    }

    /// Apply explicit overrides (e.g. command-line flags) on top of the
    /// resolved configuration.
    pub fn with_overrides(mut self, api_base_url: Option<Url>, live_view_url: Option<Url>) -> Self {
        if let Some(url) = api_base_url {
            self.api_base_url = url;
        }
        if let Some(url) = live_view_url {
            self.live_view_url = Some(url);
        }
        self
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Handle empty file
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }
}

fn parse_url_or_warn(raw: &str, field: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(value = %raw, field = field, error = %e, "Invalid URL in configuration, ignoring");
            None
        }
    }
}
