//! Toaster 配置
//!
//! 加载一次、校验后由所有 `Toaster` 克隆只读共享。
//! 磁盘格式为 JSON，camelCase 键名，所有键均可省略：
//!
//! ```json
//! {
//!   "appName": "my-app",
//!   "updateDelayMs": 100,
//!   "desktopNotifications": true,
//!   "defaults": { "theme": "dark", "autoClose": 5000 },
//!   "container": { "limit": 3 }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::ConfigError;
use crate::store::ContainerProps;
use crate::toast::ToastOptions;

const DEFAULT_UPDATE_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToasterConfig {
    /// Application name shown by native notifications.
    pub app_name: String,
    /// Delay applied to updated toasts that carry none of their own.
    pub update_delay_ms: u64,
    /// Register the desktop notifier when no other notifier is supplied.
    pub desktop_notifications: bool,
    /// Options under every caller-supplied option set.
    pub defaults: ToastOptions,
    /// Container mounted by the builder's default in-memory store.
    pub container: ContainerProps,
}

impl Default for ToasterConfig {
    fn default() -> Self {
        Self {
            app_name: "toastline".to_string(),
            update_delay_ms: DEFAULT_UPDATE_DELAY_MS,
            desktop_notifications: false,
            defaults: ToastOptions::default(),
            container: ContainerProps::default(),
        }
    }
}

impl ToasterConfig {
    /// `<config dir>/toastline/config.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("toastline")
            .join("config.json")
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: ToasterConfig =
            serde_json::from_str(content).context("Failed to parse toaster config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load from `path`, or defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No toaster config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for options in [&self.defaults, &self.container.defaults] {
            if !options.has_valid_progress() {
                return Err(ConfigError::InvalidProgress(options.progress.unwrap_or_default()));
            }
        }
        if self.container.limit == Some(0) {
            return Err(ConfigError::ZeroLimit);
        }
        Ok(())
    }

    pub fn update_delay(&self) -> Duration {
        Duration::from_millis(self.update_delay_ms)
    }
}
