use thiserror::Error;

#[derive(Error, Debug)]
pub enum CepError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response: {status}")]
    InvalidStatus { status: u16 },

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("decode error: expected a JSON object, got {kind}")]
    UnexpectedPayload { kind: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    Decode,
    Configuration,
}

impl CepError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CepError::Transport(_) => ErrorCategory::Network,
            CepError::InvalidStatus { .. } => ErrorCategory::Upstream,
            CepError::Decode(_) | CepError::UnexpectedPayload { .. } => ErrorCategory::Decode,
            CepError::Io(_)
            | CepError::ConfigError { .. }
            | CepError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Errors a fetch unit turns into report text instead of propagating.
    pub fn is_fetch_error(&self) -> bool {
        self.category() != ErrorCategory::Configuration
    }
}

pub type Result<T> = std::result::Result<T, CepError>;
