use crate::prelude::*;

pub const BASE_URL_ENV: &str = "BACKEND_BASE_URL";

/// Backend configuration from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
}

impl BackendConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, Error> {
        let base_url = std::env::var(BASE_URL_ENV).map_err(|_| not_configured())?;
        Self::new(base_url)
    }

    /// Build a configuration from an explicit base URL
    ///
    /// Trailing slashes are trimmed so endpoints can be joined with `/`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(not_configured());
        }
        Ok(Self { base_url })
    }

    /// Prefer the CLI value, then the environment
    pub fn load(base_url_override: Option<String>) -> Result<Self, Error> {
        match base_url_override {
            Some(url) => Self::new(url),
            None => Self::from_env(),
        }
    }

    /// Absolute URL of an endpoint
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

fn not_configured() -> Error {
    Error::Config(format!(
        "{BASE_URL_ENV} is not configured. Set {BASE_URL_ENV} or pass --base-url."
    ))
}
