use crate::identity::{IdentityError, IdentityVerifier, VerifiedIdentity};
use app_state::IdentitySettings;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Claims returned by Google's `tokeninfo` endpoint. Numbers arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokenClaims {
    pub aud: String,
    pub iss: String,
    pub sub: String,
    pub exp: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Verifies Google ID tokens through the `tokeninfo` endpoint.
pub struct GoogleIdentityVerifier {
    client: Client,
    tokeninfo_url: String,
    client_id: String,
}

impl GoogleIdentityVerifier {
    pub fn new(settings: &IdentitySettings) -> Result<Self, IdentityError> {
        if settings.google_client_id.trim().is_empty() {
            return Err(IdentityError::Misconfigured(
                "identity.google_client_id is empty".to_owned(),
            ));
        }
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout())
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            client,
            tokeninfo_url: settings.tokeninfo_url.clone(),
            client_id: settings.google_client_id.clone(),
        })
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        if token.trim().is_empty() {
            return Err(IdentityError::InvalidToken("empty token".to_owned()));
        }
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", token)])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {}
            status if status.is_client_error() => {
                debug!("Token rejected by provider with {status}");
                return Err(IdentityError::InvalidToken(format!(
                    "provider responded with {status}"
                )));
            }
            status => {
                warn!("Unexpected tokeninfo status {status}");
                return Err(response.error_for_status().err().map_or_else(
                    || IdentityError::InvalidToken(format!("unexpected status {status}")),
                    IdentityError::Request,
                ));
            }
        }

        let claims: GoogleTokenClaims = response.json().await?;
        validate_claims(claims, &self.client_id, Utc::now())
    }
}

/// Check audience, issuer and expiry, and turn the claims into a profile.
pub fn validate_claims(
    claims: GoogleTokenClaims,
    client_id: &str,
    now: DateTime<Utc>,
) -> Result<VerifiedIdentity, IdentityError> {
    if claims.aud != client_id {
        return Err(IdentityError::InvalidToken("audience mismatch".to_owned()));
    }
    if !GOOGLE_ISSUERS.contains(&claims.iss.as_str()) {
        return Err(IdentityError::InvalidToken(format!(
            "unexpected issuer {}",
            claims.iss
        )));
    }
    let expires_at = claims
        .exp
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| IdentityError::InvalidToken("malformed exp".to_owned()))?;
    if expires_at <= now {
        return Err(IdentityError::InvalidToken("token expired".to_owned()));
    }
    let email = claims
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| IdentityError::InvalidToken("token has no email".to_owned()))?;

    Ok(VerifiedIdentity {
        subject_id: claims.sub,
        name: claims
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.clone()),
        email,
        picture_url: claims.picture,
    })
}
