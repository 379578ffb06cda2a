use async_trait::async_trait;
use common_services::identity::{IdentityError, IdentityVerifier, VerifiedIdentity};

/// Accepts tokens of the form `valid:{subject}` and rejects everything else.
pub struct StubIdentityVerifier;

pub fn token_for(subject: &str) -> String {
    format!("valid:{subject}")
}

#[async_trait]
impl IdentityVerifier for StubIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let subject = token
            .strip_prefix("valid:")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| IdentityError::InvalidToken("not a stub token".to_owned()))?;
        Ok(VerifiedIdentity {
            subject_id: subject.to_owned(),
            email: format!("{subject}@example.com"),
            name: format!("User {subject}"),
            picture_url: Some(format!("https://pictures.example.com/{subject}.png")),
        })
    }
}
