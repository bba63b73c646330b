//! Settings type definitions.
//!
//! Field names are camelCase on disk. Every section is `#[serde(default)]`,
//! so a partial file only overrides what it names.

use std::time::Duration;

use eventdesk_core::ErrorPolicy;
use serde::{Deserialize, Serialize};

/// Collection endpoint used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/project/events";

/// Root settings type.
///
/// ```json
/// {
///   "api": { "baseUrl": "http://localhost:8080/project/events" },
///   "logging": { "level": "info" },
///   "ui": { "errorPolicy": "clearOnSuccess" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeskSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub ui: UiSettings,
}

impl DeskSettings {
    /// Reject values no command can work with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(crate::SettingsError::InvalidValue(
                "api.baseUrl must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Remote collection endpoint and transport limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    pub base_url: String,
    /// Unset means wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,
    /// Unset means wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_ms: None,
            request_timeout_ms: None,
        }
    }
}

impl ApiSettings {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiSettings {
    pub error_policy: ErrorPolicy,
}
