use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Malformed JSONP response from {url}: {reason}")]
    MalformedJsonp { url: String, reason: String },

    #[error("Cache error: {0}")]
    Io(#[from] std::io::Error),
}
