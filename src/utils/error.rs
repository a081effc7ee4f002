use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Automation request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidFieldValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing credential: set {names}")]
    MissingCredential { names: String },

    #[error("Automation session failed: {message}")]
    SessionError { message: String },
}

pub type Result<T> = std::result::Result<T, AgentError>;
