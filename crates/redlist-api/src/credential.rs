//! API key resolution
//!
//! Order: explicit argument, then `IUCN_REDLIST_KEY`, then the persisted
//! options file. Resolved fresh for every request.

use std::path::Path;

use tracing::debug;

use crate::error::{RedListError, Result, KEY_ENV_VAR};
use crate::options::StoredOptions;
use crate::types::Credential;

/// Candidate values from each credential source, highest priority first
#[derive(Debug, Default, Clone)]
pub struct CredentialSources {
    pub explicit: Option<String>,
    pub env: Option<String>,
    pub persisted: Option<String>,
}

/// Pick the first non-empty source
pub fn resolve_from(sources: &CredentialSources) -> Result<Credential> {
    let candidates = [
        ("argument", &sources.explicit),
        ("environment", &sources.env),
        ("options", &sources.persisted),
    ];

    for (origin, value) in candidates {
        if let Some(credential) = value.as_deref().and_then(Credential::new) {
            debug!(origin, "Resolved API key");
            return Ok(credential);
        }
    }

    Err(RedListError::MissingCredential)
}

/// Resolve against the live environment and the options file at `options_path`
pub fn resolve(explicit: Option<&str>, options_path: Option<&Path>) -> Result<Credential> {
    let mut sources = CredentialSources {
        explicit: explicit.map(str::to_string),
        env: std::env::var(KEY_ENV_VAR).ok(),
        persisted: None,
    };

    // Only touch the filesystem when the cheaper sources came up empty.
    if let Ok(credential) = resolve_from(&sources) {
        return Ok(credential);
    }

    if let Some(path) = options_path {
        sources.persisted = StoredOptions::load(path)?
            .and_then(|o| o.stored_key().map(str::to_string));
    }

    resolve_from(&sources)
}
