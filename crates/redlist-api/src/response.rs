//! Response classification
//!
//! Maps a status code and raw body to either the body or a typed failure.
//! The API sometimes reports errors inside a 200 body, so successful
//! statuses still get their JSON inspected.

use serde_json::Value;
use tracing::warn;

use crate::error::{RedListError, Result};

/// Top-level keys that mark an error document
const ERROR_KEYS: [&str; 2] = ["message", "error"];

/// Classify one response, returning the raw body on success
pub fn classify(status: u16, body: String) -> Result<String> {
    match status {
        401 => return Err(RedListError::Unauthorized),
        404 => return Err(RedListError::NotFound),
        s if s >= 300 => return Err(RedListError::Http { status: s }),
        _ => {}
    }

    let doc: Value = serde_json::from_str(&body)?;
    if let Some(message) = embedded_error(&doc) {
        warn!(status, message = %message, "Red List API returned an error document");
        return Err(RedListError::Api(message));
    }

    Ok(body)
}

fn embedded_error(doc: &Value) -> Option<String> {
    let obj = doc.as_object()?;
    ERROR_KEYS.iter().find_map(|key| {
        obj.get(*key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    })
}
