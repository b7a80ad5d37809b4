use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslatorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Completion service unreachable: {0}")]
    Transport(String),

    #[error("Completion service error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("OpenAI Response didn't contain choices")]
    EmptyResponse,

    #[error("Failed to decode completion answer: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TranslatorError {
    /// True when the failure originated in the external completion service.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Transport(_) | Self::Api { .. } | Self::EmptyResponse | Self::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TranslatorError>;
