//! Error types for the redlist CLI

use std::fmt;

use redlist_api::RedListError;

#[derive(Debug)]
pub enum CliError {
    Api(RedListError),
    Config(String),
    Output(String),
}

impl CliError {
    /// Process exit status: 2 when the API reported the failure, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Api(err) if err.is_api_failure() => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Api(err) => write!(f, "{}", err),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Output(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RedListError> for CliError {
    fn from(err: RedListError) -> Self {
        CliError::Api(err)
    }
}

impl From<tracing_subscriber::filter::ParseError> for CliError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Output(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
