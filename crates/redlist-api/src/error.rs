//! Error types for the Red List API client

use std::fmt;

/// Environment variable consulted for the API key
pub const KEY_ENV_VAR: &str = "IUCN_REDLIST_KEY";

/// Errors that can occur when interacting with the IUCN Red List API
#[derive(Debug)]
pub enum RedListError {
    /// No API key was supplied by argument, environment, or options file
    MissingCredential,
    /// HTTP 401
    Unauthorized,
    /// HTTP 404
    NotFound,
    /// Any other status >= 300
    Http { status: u16 },
    /// A 2xx body carrying a `message` or `error` field
    Api(String),
    /// Body could not be decoded as JSON
    Parse(String),
    /// A caller-supplied argument was rejected before any request was made
    Validation(String),
    /// Network-level failure (connect, DNS, timeout)
    Transport(reqwest::Error),
    /// Invalid client configuration (base URL, proxy, headers)
    Config(String),
    /// Reading or writing the persisted options file failed
    Options(String),
}

impl RedListError {
    /// Whether the failure was reported by the API rather than the client
    pub fn is_api_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::NotFound | Self::Http { .. } | Self::Api(_)
        )
    }
}

impl fmt::Display for RedListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(
                f,
                "You need an API key for IUCN Red List data; pass one explicitly, set {} or store one with `redlist set-key`",
                KEY_ENV_VAR
            ),
            Self::Unauthorized => write!(f, "Token not valid!"),
            Self::NotFound => write!(f, "No results returned for query."),
            Self::Http { status } => write!(f, "HTTP error: status {}", status),
            Self::Api(msg) => write!(f, "{}", msg),
            Self::Parse(msg) => write!(f, "JSON parse error: {}", msg),
            Self::Validation(msg) => write!(f, "Invalid argument: {}", msg),
            Self::Transport(e) => write!(f, "Red List HTTP error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Options(msg) => write!(f, "Options file error: {}", msg),
        }
    }
}

impl std::error::Error for RedListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RedListError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

impl From<serde_json::Error> for RedListError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<url::ParseError> for RedListError {
    fn from(e: url::ParseError) -> Self {
        Self::Config(format!("invalid URL: {}", e))
    }
}

/// Result type for Red List API operations
pub type Result<T> = std::result::Result<T, RedListError>;
