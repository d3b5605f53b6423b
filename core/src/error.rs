use thiserror::Error;

/// qrbadge error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to serialize/deserialize: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid error correction level: {0}")]
    InvalidLevel(String),

    #[error("Unknown export format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported logo: {0}")]
    UnsupportedLogo(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
