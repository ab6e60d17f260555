//! read client configuration from values, a file, or the environment

use serde::Deserialize;

use crate::errors::Error;

/// Base URLs for the storefront service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Resource endpoints: products, cart, wishlist.
    pub api_url: String,
    /// Identity endpoints: login, register, refresh, logout.
    pub auth_url: String,
}

impl Config {
    pub fn new(api_url: impl Into<String>, auth_url: impl Into<String>) -> Self {
        Config {
            api_url: normalize(api_url.into()),
            auth_url: normalize(auth_url.into()),
        }
    }

    /// Derives both base URLs from the server root using the service's
    /// default layout: `{base}/api/v1` and `{base}/api/v1/auth`.
    pub fn from_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Config::new(format!("{base}/api/v1"), format!("{base}/api/v1/auth"))
    }

    /// # ENV Vars
    /// * `STOREFRONT_API_URL` - base URL for the resource endpoints
    /// * `STOREFRONT_AUTH_URL` - base URL for the identity endpoints
    pub fn from_env() -> Result<Self, Error> {
        let api_url = std::env::var("STOREFRONT_API_URL")
            .map_err(|_| Error::Config("Missing STOREFRONT_API_URL env var".to_string()))?;
        let auth_url = std::env::var("STOREFRONT_AUTH_URL")
            .map_err(|_| Error::Config("Missing STOREFRONT_AUTH_URL env var".to_string()))?;
        Ok(Config::new(api_url, auth_url))
    }

    /// Reads a JSON file with `api_url` and `auth_url` keys.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(Config::new(config.api_url, config.auth_url))
    }

    /// Both URLs must parse before any network call is attempted.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        for url in [&self.api_url, &self.auth_url] {
            reqwest::Url::parse(url)
                .map_err(|e| Error::Config(format!("Invalid base URL '{url}': {e}")))?;
        }
        Ok(())
    }
}

fn normalize(url: String) -> String {
    let url = url.trim().trim_end_matches('/').to_string();
    if url.starts_with("http") {
        url
    } else {
        format!("https://{url}")
    }
}
