mod error;
mod google;

pub use error::IdentityError;
pub use google::*;

use async_trait::async_trait;

/// Profile of a user as vouched for by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject_id: String,
    pub email: String,
    pub name: String,
    pub picture_url: Option<String>,
}

/// Exchanges an opaque identity token for a verified profile.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError>;
}
