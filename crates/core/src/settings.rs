//! Client settings
//!
//! Settings are layered: built-in defaults, then an optional file, then
//! `CRM__`-prefixed environment variables (e.g. `CRM__BASE_URL`).

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Path prefix every API endpoint is resolved under
pub const DEFAULT_API_PREFIX: &str = "/api/";

/// Endpoint that exchanges a refresh token for a new access token
pub const DEFAULT_REFRESH_PATH: &str = "/api/token/refresh/";

/// Page the browser is sent to when the session cannot be recovered
pub const DEFAULT_LOGIN_PATH: &str = "/login/";

/// Settings error types
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A value was read but is not usable
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Settings for the authenticated CRM client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Scheme and host of the CRM backend, without a trailing path
    pub base_url: String,

    /// Prefix joined between `base_url` and every endpoint
    pub api_prefix: String,

    /// Absolute path of the token refresh endpoint
    pub refresh_path: String,

    /// Absolute path of the login page
    pub login_path: String,

    /// Request timeout in seconds (native targets only)
    pub timeout_secs: Option<u64>,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            timeout_secs: None,
            user_agent: format!("crm-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientSettings {
    /// Load settings from a file, with environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting settings fail validation
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from defaults and environment variables only
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed or the
    /// resulting settings fail validation
    pub fn from_env() -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(environment())
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that URLs and paths have the shape the client expects
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] naming the first offending field
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SettingsError::Invalid {
                field: "base_url",
                reason: format!("expected an http(s) URL, got {:?}", self.base_url),
            });
        }

        for (field, value) in [
            ("api_prefix", &self.api_prefix),
            ("refresh_path", &self.refresh_path),
            ("login_path", &self.login_path),
        ] {
            if !value.starts_with('/') {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must start with '/', got {value:?}"),
                });
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(SettingsError::Invalid {
                field: "timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("CRM")
        .separator("__")
        .try_parsing(true)
}
