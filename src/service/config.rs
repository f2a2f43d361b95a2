//! Reporting-service connection settings.
//!
//! Values come from the CLI, which falls back to `COGNOS_URL`, `COGNOS_USER`
//! and `COGNOS_PASS`. Credentials have no defaults; the URL has a placeholder.

use std::fmt;

use super::errors::ServiceError;

/// Placeholder tenant URL used when `COGNOS_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://yourtenant.cognosanalytics.ibmcloud.com/bi";

/// Validated connection settings for the reporting service.
#[derive(Clone)]
pub struct ServiceConfig {
    base_url: String,
    username: String,
    password: String,
}

impl ServiceConfig {
    /// Validate and build a config.
    ///
    /// The base URL must be http(s); a trailing `/` is trimmed so endpoint
    /// paths can be appended directly. Username and password must be present
    /// and non-blank.
    pub fn new(
        base_url: &str,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, ServiceError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ServiceError::ConfigError {
                reason: format!("base URL must start with http:// or https://, got '{base_url}'"),
            });
        }

        let username = require_non_blank(username, "COGNOS_USER")?;
        let password = require_non_blank(password, "COGNOS_PASS")?;

        Ok(Self {
            base_url,
            username,
            password,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Join an endpoint path (starting with `/`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn require_non_blank(value: Option<String>, var: &str) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::ConfigError {
            reason: format!("{var} is not set"),
        }),
    }
}
