use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Blob request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Blob io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blob service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid blob key: {0}")]
    InvalidKey(String),
}
