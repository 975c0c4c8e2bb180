//! Store and controller configuration.
//!
//! `StoreConfig` carries the public endpoint and anon key of the hosted note
//! table. These are safe-to-ship values; service-role secrets must never be
//! stored here.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_TABLE: &str = "notes";
pub const DEFAULT_REALTIME_CHANNEL: &str = "realtime-notes";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_PREVIEW_CHARS: usize = 120;

/// Connection settings for the hosted note table.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub supabase_url: String,
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_realtime_channel")]
    pub realtime_channel: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("StoreConfig")
            .field("supabase_url", &self.supabase_url)
            .field("anon_key", &"[REDACTED]")
            .field("table", &self.table)
            .field("realtime_channel", &self.realtime_channel)
            .finish()
    }
}

impl StoreConfig {
    /// Build a validated config from raw values.
    ///
    /// The URL must use http(s) and loses any trailing slash; the key must be
    /// non-empty. Table and channel fall back to their defaults when blank.
    pub fn new(
        supabase_url: Option<String>,
        anon_key: Option<String>,
        table: Option<String>,
    ) -> Result<Self> {
        let supabase_url = normalize_required_http_url(supabase_url, "supabase_url")?;
        let anon_key = normalize_setting(anon_key)
            .ok_or_else(|| Error::Config("'anon_key' is required".to_string()))?;
        let table = normalize_setting(table).unwrap_or_else(default_table);

        Ok(Self {
            supabase_url,
            anon_key,
            table,
            realtime_channel: default_realtime_channel(),
        })
    }

    /// Base URL of the PostgREST table endpoint.
    pub fn rest_table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.supabase_url, self.table)
    }
}

/// Timing and presentation knobs of the notes controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Quiet period after the last search keystroke before filtering.
    pub search_debounce: Duration,
    /// Body preview length on note cards, in characters.
    pub preview_chars: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Trimmed setting value; blank or unset values become `None`.
pub fn normalize_setting(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_realtime_channel() -> String {
    DEFAULT_REALTIME_CHANNEL.to_string()
}

fn normalize_required_http_url(raw: Option<String>, field: &str) -> Result<String> {
    let value = normalize_setting(raw)
        .ok_or_else(|| Error::Config(format!("'{field}' is required")))?;
    if value.starts_with("https://") || value.starts_with("http://") {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(Error::Config(format!(
            "'{field}' must include http:// or https://"
        )))
    }
}
