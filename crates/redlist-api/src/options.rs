//! Persisted client options
//!
//! A small JSON file holding settings that outlive a single process, most
//! importantly the stored API key used as the last credential fallback.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RedListError, Result};

/// Environment variable overriding the options file location
pub const OPTIONS_ENV_VAR: &str = "REDLIST_OPTIONS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredOptions {
    /// Stored IUCN Red List API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl StoredOptions {
    /// Load options from `path`; a missing file yields `None`
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No options file");
                return Ok(None);
            }
            Err(e) => {
                return Err(RedListError::Options(format!("{}: {}", path.display(), e)));
            }
        };

        let options = serde_json::from_str(&text)
            .map_err(|e| RedListError::Options(format!("{}: {}", path.display(), e)))?;
        Ok(Some(options))
    }

    /// Write options to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RedListError::Options(format!("{}: {}", parent.display(), e)))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)
            .map_err(|e| RedListError::Options(format!("{}: {}", path.display(), e)))
    }

    /// The stored key, if present and non-blank
    pub fn stored_key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Default options file: `$REDLIST_OPTIONS`, else `redlist/options.json`
/// under the platform config directory
pub fn default_path() -> Option<PathBuf> {
    options_path(std::env::var(OPTIONS_ENV_VAR).ok(), dirs::config_dir())
}

fn options_path(override_path: Option<String>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = override_path.filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(p));
    }
    config_dir.map(|d| d.join("redlist").join("options.json"))
}

/// Persist `key` into the options file at `path`, keeping other settings
pub fn store_key(path: &Path, key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(RedListError::Validation("key must not be empty".to_string()));
    }
    let mut options = StoredOptions::load(path)?.unwrap_or_default();
    options.key = Some(key.trim().to_string());
    options.save(path)
}
