use std::env;
use std::time::Duration;

use redlist_api::{ClientConfig, DEFAULT_BASE_URL};

use crate::error::{CliError, Result};

/// CLI configuration parsed from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub proxy: Option<String>,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = get("REDLIST_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match get("REDLIST_TIMEOUT_SECS") {
            Some(s) => {
                let secs: u64 = s.trim().parse().map_err(|_| {
                    CliError::Config(format!("REDLIST_TIMEOUT_SECS must be a number, got '{}'", s))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let proxy = get("REDLIST_PROXY").filter(|s| !s.trim().is_empty());

        Ok(Self {
            base_url,
            timeout,
            proxy,
        })
    }

    /// Client settings, with `key` taking priority over every other source
    pub fn client_config(&self, key: Option<&str>) -> ClientConfig {
        let mut config = ClientConfig::new().with_base_url(&self.base_url);
        if let Some(key) = key {
            config = config.with_key(key);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(proxy);
        }
        config
    }
}
