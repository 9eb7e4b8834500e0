use gitsync_syntax::ParseError;
use std::fmt;

/// Failure while producing the host-facing [`App`](crate::app::App).
#[derive(Debug)]
pub enum ConfigError {
    Parse(ParseError),
    Serialize(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "{}", e),
            ConfigError::Serialize(e) => write!(f, "failed to serialize git app config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
        }
    }
}

impl From<ParseError> for ConfigError {
    fn from(err: ParseError) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serialize(err)
    }
}
