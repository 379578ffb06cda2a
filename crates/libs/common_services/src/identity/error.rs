use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The token was rejected, expired, or issued for another client.
    #[error("Invalid identity token: {0}")]
    InvalidToken(String),

    #[error("Identity provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Identity verifier misconfigured: {0}")]
    Misconfigured(String),
}
