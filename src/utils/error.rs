use thiserror::Error;

#[derive(Error, Debug)]
pub enum SocialworthError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unknown service {0}")]
    UnknownService(String),

    #[error("You must specify an address to query")]
    MissingTarget,

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SocialworthError {
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        SocialworthError::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Network, HTTP status and timeout failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, SocialworthError::Transport { .. })
    }
}

pub type Result<T> = std::result::Result<T, SocialworthError>;
