//! Client configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "https://www.transparentclassroom.com";

pub const HOST_VAR: &str = "TRANSPARENT_CLASSROOM_HOST";
pub const EMAIL_VAR: &str = "TRANSPARENT_CLASSROOM_EMAIL";
pub const PASSWORD_VAR: &str = "TRANSPARENT_CLASSROOM_PASSWORD";
pub const MASQUERADE_ID_VAR: &str = "TRANSPARENT_CLASSROOM_MASQUERADE_ID";
pub const SCHOOL_ID_VAR: &str = "TRANSPARENT_CLASSROOM_SCHOOL_ID";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("setting `{name}` must be an integer, got `{value}`")]
    InvalidInteger { name: &'static str, value: String },
}

/// Credentials and routing options for a `TransparentClassroomClient`.
///
/// Deserializes from a settings object; `host` and the ids are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub email: String,
    pub password: String,
    /// Act as another user (admin accounts only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masquerade_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<i64>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl ClientConfig {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            email: email.into(),
            password: password.into(),
            masquerade_id: None,
            school_id: None,
        }
    }

    /// Set the API host. Trailing `/` characters are dropped.
    pub fn host(mut self, host: impl AsRef<str>) -> Self {
        self.host = normalize_host(host.as_ref());
        self
    }

    pub fn masquerade_id(mut self, id: i64) -> Self {
        self.masquerade_id = Some(id);
        self
    }

    pub fn school_id(mut self, id: i64) -> Self {
        self.school_id = Some(id);
        self
    }

    /// Read the configuration from `TRANSPARENT_CLASSROOM_*` environment
    /// variables. Email and password are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let email = lookup(EMAIL_VAR).ok_or(ConfigError::Missing(EMAIL_VAR))?;
        let password = lookup(PASSWORD_VAR).ok_or(ConfigError::Missing(PASSWORD_VAR))?;
        let mut config = Self::new(email, password);

        if let Some(host) = lookup(HOST_VAR) {
            config = config.host(host);
        }
        config.masquerade_id = parse_id(MASQUERADE_ID_VAR, lookup(MASQUERADE_ID_VAR))?;
        config.school_id = parse_id(SCHOOL_ID_VAR, lookup(SCHOOL_ID_VAR))?;
        Ok(config)
    }
}

pub(crate) fn normalize_host(host: &str) -> String {
    let trimmed = host.trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_HOST.to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_id(name: &'static str, value: Option<String>) -> Result<Option<i64>, ConfigError> {
    value
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidInteger { name, value: raw })
        })
        .transpose()
}
