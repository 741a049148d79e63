use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Config, DEFAULT_PAGE_SIZE};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: Option<ApiConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub list_url: Option<String>,
    pub detail_url: Option<String>,
    pub artwork_url_template: Option<String>,
    pub page_size: Option<u32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub debounce_ms: Option<u64>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Platform config directory path: `<config_dir>/pokedex/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pokedex").join("config.toml"))
}

/// Load config by cascading CWD `.pokedex.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pokedex.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    match load_strict(path) {
        Ok(config) => Some(config),
        Err(ConfigError::Read { .. }) => None,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable config file");
            None
        }
    }
}

/// Load a config the user pointed at explicitly; errors are surfaced.
pub fn load_strict(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_api = base.api.unwrap_or_default();
    let overlay_api = overlay.api.unwrap_or_default();
    let base_display = base.display.unwrap_or_default();
    let overlay_display = overlay.display.unwrap_or_default();

    ConfigFile {
        api: Some(ApiConfig {
            list_url: overlay_api.list_url.or(base_api.list_url),
            detail_url: overlay_api.detail_url.or(base_api.detail_url),
            artwork_url_template: overlay_api
                .artwork_url_template
                .or(base_api.artwork_url_template),
            page_size: overlay_api.page_size.or(base_api.page_size),
            timeout_secs: overlay_api.timeout_secs.or(base_api.timeout_secs),
        }),
        display: Some(DisplayConfig {
            theme: overlay_display.theme.or(base_display.theme),
            debounce_ms: overlay_display.debounce_ms.or(base_display.debounce_ms),
        }),
    }
}

impl ConfigFile {
    /// Overlay the values present in this file onto `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(api) = &self.api {
            if let Some(url) = &api.list_url {
                config.list_url = url.clone();
            }
            if let Some(url) = &api.detail_url {
                config.detail_url = url.clone();
            }
            if let Some(template) = &api.artwork_url_template {
                config.artwork_template = template.clone();
            }
            if let Some(size) = api.page_size {
                config.page_size = sanitize_page_size(size);
            }
            if let Some(secs) = api.timeout_secs {
                config.timeout_secs = secs;
            }
        }
        if let Some(ms) = self.display.as_ref().and_then(|d| d.debounce_ms) {
            config.debounce = Duration::from_millis(ms);
        }
    }

    pub fn theme(&self) -> Option<&str> {
        self.display.as_ref().and_then(|d| d.theme.as_deref())
    }

    /// Build a runtime [`Config`] from defaults plus this file.
    pub fn to_config(&self) -> Config {
        let mut config = Config::default();
        self.apply_to(&mut config);
        config
    }
}

/// Apply `POKEDEX_*` environment overrides on top of file values.
pub fn apply_env(config: &mut Config) {
    apply_env_with(config, |key| std::env::var(key).ok());
}

fn apply_env_with(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(url) = var("POKEDEX_LIST_URL") {
        config.list_url = url;
    }
    if let Some(url) = var("POKEDEX_DETAIL_URL") {
        config.detail_url = url;
    }
    if let Some(size) = var("POKEDEX_PAGE_SIZE").and_then(|v| v.parse().ok()) {
        config.page_size = sanitize_page_size(size);
    }
    if let Some(secs) = var("POKEDEX_TIMEOUT").and_then(|v| v.parse().ok()) {
        config.timeout_secs = secs;
    }
}

/// A zero page size would make every page empty; fall back to the default.
pub fn sanitize_page_size(size: u32) -> u32 {
    if size == 0 {
        tracing::warn!("page_size = 0 is invalid, using {}", DEFAULT_PAGE_SIZE);
        DEFAULT_PAGE_SIZE
    } else {
        size
    }
}
