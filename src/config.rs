//! Runtime configuration.
//!
//! Layers, lowest priority first: built-in defaults, an optional TOML file,
//! then `.env` / process environment overrides.

use crate::error::{UiError, UiResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use url::Url;

pub const ENV_BASE_URL: &str = "CHURN_UI_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "CHURN_UI_TIMEOUT_SECS";
pub const ENV_BANNER_HIDE_MS: &str = "CHURN_UI_BANNER_HIDE_MS";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub backend: BackendConfig,
    pub dom: DomConfig,
    pub banner: BannerConfig,
}

/// Where the prediction service lives and how its endpoints are named.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub predict_path: String,
    pub customer_param: String,
    pub status_path: String,
    pub index_path: String,
    pub report_path: String,
    /// `None` means requests run until the transport gives up.
    pub request_timeout_seconds: Option<u64>,
    /// Treat non-2xx answers as failed requests instead of showing their body.
    pub fail_on_http_status: bool,
}

/// Naming contract between the rendered page and the dispatcher.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DomConfig {
    pub trigger_class: String,
    pub customer_attr: String,
    pub row_attr: String,
    pub slot_prefix: String,
    pub banner_id: String,
    pub loading_text: String,
    pub error_text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BannerConfig {
    pub hide_after_ms: u64,
    pub policy: HidePolicy,
}

/// What a repeated `show()` does to a hide that is still pending.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HidePolicy {
    /// Abort the pending hide and start the delay over.
    #[default]
    Reschedule,
    /// Leave earlier hides alone; each call schedules its own.
    Stack,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            predict_path: "/predict".to_string(),
            customer_param: "customerID".to_string(),
            status_path: "/".to_string(),
            index_path: "/index".to_string(),
            report_path: "/download-report".to_string(),
            request_timeout_seconds: None,
            fail_on_http_status: true,
        }
    }
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            trigger_class: "predict-btn".to_string(),
            customer_attr: "data-customerid".to_string(),
            row_attr: "data-rowid".to_string(),
            slot_prefix: "result-".to_string(),
            banner_id: "loading-message".to_string(),
            loading_text: "Loading...".to_string(),
            error_text: "Error".to_string(),
        }
    }
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            hide_after_ms: 1000,
            policy: HidePolicy::Reschedule,
        }
    }
}

impl DomConfig {
    /// Element id of the result slot belonging to `row_id`.
    pub fn slot_id(&self, row_id: &str) -> String {
        format!("{}{}", self.slot_prefix, row_id)
    }
}

impl UiConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> UiResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            UiError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| UiError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Loads `path` when it exists, otherwise starts from defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> UiResult<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            debug!(path = %path.as_ref().display(), "Config file absent, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies `.env` and process environment overrides.
    pub fn with_env_overrides(self) -> UiResult<Self> {
        dotenv::dotenv().ok();
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> UiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_BASE_URL) {
            self.backend.base_url = base;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                UiError::Config(format!("{} must be a number of seconds: {}", ENV_TIMEOUT_SECS, e))
            })?;
            self.backend.request_timeout_seconds = Some(secs);
        }
        if let Some(raw) = lookup(ENV_BANNER_HIDE_MS) {
            self.banner.hide_after_ms = raw.trim().parse::<u64>().map_err(|e| {
                UiError::Config(format!("{} must be milliseconds: {}", ENV_BANNER_HIDE_MS, e))
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> UiResult<()> {
        let base = Url::parse(&self.backend.base_url).map_err(|e| {
            UiError::Config(format!("Invalid base URL {:?}: {}", self.backend.base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(UiError::Config(format!(
                "Base URL {:?} cannot carry endpoint paths",
                self.backend.base_url
            )));
        }

        let mut missing = Vec::new();
        if self.backend.customer_param.is_empty() {
            missing.push("backend.customer_param");
        }
        if self.dom.trigger_class.is_empty() {
            missing.push("dom.trigger_class");
        }
        if self.dom.slot_prefix.is_empty() {
            missing.push("dom.slot_prefix");
        }
        if self.dom.banner_id.is_empty() {
            missing.push("dom.banner_id");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(UiError::Config(format!("Empty required settings: {}", missing.join(", "))))
        }
    }
}
