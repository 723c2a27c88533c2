//! Console configuration: API endpoint, language override, request timeout
//! and the location of the session file. Values come from the command line
//! or environment; blank values fall back to defaults. Configuration values
//! are not secret; tokens never live here.

use crate::app_lib::AppError;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
/// Request timeout applied to every API call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Explicit language; when unset the stored preference is used.
    pub language: Option<String>,
    pub timeout: Duration,
    /// Where tokens are persisted; `None` keeps them in memory only.
    pub session_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            language: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: default_session_file(),
        }
    }
}

/// Raw values as given by the user, before normalization.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub language: Option<String>,
    pub timeout_secs: Option<u64>,
    pub session_file: Option<String>,
    pub ephemeral: bool,
}

impl AppConfig {
    /// Builds the config from defaults and applies user overrides.
    #[must_use]
    pub fn load(overrides: ConfigOverrides) -> Self {
        let mut config = Self::default();
        apply_overrides(&mut config, overrides);
        config
    }

    /// Checks that the API base URL is an absolute http(s) URL.
    ///
    /// # Errors
    /// Returns `AppError::Config` describing the problem.
    pub fn validate(&self) -> Result<(), AppError> {
        let url = Url::parse(&self.api_base_url).map_err(|err| {
            AppError::Config(format!("Invalid API URL '{}': {err}", self.api_base_url))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::Config(format!(
                "Unsupported API URL scheme '{scheme}', expected http or https"
            ))),
        }
    }
}

fn apply_overrides(config: &mut AppConfig, overrides: ConfigOverrides) {
    if let Some(value) = overrides.api_base_url.as_deref().and_then(normalize_value) {
        config.api_base_url = value.trim_end_matches('/').to_string();
    }
    if let Some(value) = overrides.language.as_deref().and_then(normalize_value) {
        config.language = Some(value);
    }
    if let Some(secs) = overrides.timeout_secs.filter(|secs| *secs > 0) {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(value) = overrides.session_file.as_deref().and_then(normalize_value) {
        config.session_file = Some(PathBuf::from(value));
    }
    if overrides.ephemeral {
        config.session_file = None;
    }
}

/// `<config dir>/rbac-console/session.json`, or `None` when the platform has
/// no config directory.
#[must_use]
pub fn default_session_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rbac-console").join("session.json"))
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
