use core::fmt;

/// Failure while reading an [`EngineConfig`](crate::EngineConfig) from JSON
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The input was not valid JSON for the config schema
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "CONFIG_PARSE: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
