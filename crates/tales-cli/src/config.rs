//! Connection settings resolved from flags, environment and config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tales_core::config::{normalize_setting, ControllerConfig, StoreConfig};

use crate::cli::ConnectionArgs;
use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";

/// Contents of `{config_dir}/tales/config.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfigFile {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub realtime_channel: Option<String>,
    #[serde(default)]
    pub search_debounce_ms: Option<u64>,
    #[serde(default)]
    pub preview_chars: Option<usize>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tales").join(CONFIG_FILE_NAME))
}

impl CliConfigFile {
    /// Load the config at `path`, or the default location when `None`.
    ///
    /// A missing file is an empty config.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            CliError::Config(format!(
                "Failed to read config at {}: {}",
                path.display(),
                error
            ))
        })?;
        serde_json::from_str::<Self>(&raw).map_err(|error| {
            CliError::Config(format!(
                "Failed to parse config at {}: {}",
                path.display(),
                error
            ))
        })
    }

    pub fn controller_config(&self) -> ControllerConfig {
        let defaults = ControllerConfig::default();
        ControllerConfig {
            search_debounce: self
                .search_debounce_ms
                .map_or(defaults.search_debounce, Duration::from_millis),
            preview_chars: self.preview_chars.unwrap_or(defaults.preview_chars),
        }
    }
}

/// Merge flags, environment (via `env`) and the config file, in that order.
pub fn resolve_store_config(
    args: &ConnectionArgs,
    env: impl Fn(&str) -> Option<String>,
    file: &CliConfigFile,
) -> Result<StoreConfig, CliError> {
    let from_env = |keys: &[&str]| keys.iter().find_map(|key| normalize_setting(env(key)));

    let supabase_url = normalize_setting(args.supabase_url.clone())
        .or_else(|| from_env(&["TALES_SUPABASE_URL", "SUPABASE_URL"]))
        .or_else(|| normalize_setting(file.supabase_url.clone()))
        .ok_or_else(|| {
            CliError::Config(
                "Supabase URL is not set. Pass --supabase-url or set TALES_SUPABASE_URL."
                    .to_string(),
            )
        })?;
    let anon_key = normalize_setting(args.anon_key.clone())
        .or_else(|| from_env(&["TALES_SUPABASE_ANON_KEY", "SUPABASE_ANON_KEY"]))
        .or_else(|| normalize_setting(file.supabase_anon_key.clone()))
        .ok_or_else(|| {
            CliError::Config(
                "Anon key is not set. Pass --anon-key or set TALES_SUPABASE_ANON_KEY.".to_string(),
            )
        })?;
    let table = normalize_setting(args.table.clone())
        .or_else(|| from_env(&["TALES_TABLE"]))
        .or_else(|| normalize_setting(file.table.clone()));

    let mut config = StoreConfig::new(Some(supabase_url), Some(anon_key), table)
        .map_err(|error| CliError::Config(error.to_string()))?;
    if let Some(channel) = normalize_setting(file.realtime_channel.clone()) {
        config.realtime_channel = channel;
    }
    Ok(config)
}
