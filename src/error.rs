use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    /// Request never produced a response (connect, timeout, transport).
    #[error("Network error: {0}")]
    Network(String),

    #[error("Catalog API {status}: {body}")]
    Status { status: u16, body: String },

    /// Response arrived but the payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FeedError::Decode(err.to_string())
        } else {
            FeedError::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
