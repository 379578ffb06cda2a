use crate::api::auth::interfaces::{AuthResponse, UserResponse};
use crate::api::error::ApiError;
use crate::database::DataStore;
use crate::database::app_user::NewUser;
use crate::identity::IdentityVerifier;
use tracing::{info, instrument};

/// Verify an identity token and create or refresh the matching user.
#[instrument(skip(store, identity, token), err(Debug))]
pub async fn sign_in_with_google(
    store: &dyn DataStore,
    identity: &dyn IdentityVerifier,
    token: &str,
) -> Result<AuthResponse, ApiError> {
    let verified = identity.verify(token).await?;
    let user = store
        .upsert_user(&NewUser {
            identity_provider_id: verified.subject_id,
            email: verified.email,
            display_name: verified.name,
            picture_url: verified.picture_url,
        })
        .await?;
    info!("User {} signed in", user.id);

    Ok(AuthResponse {
        user: user.into(),
        message: "Authentication successful".to_owned(),
    })
}

#[instrument(skip(store), err(Debug))]
pub async fn get_user(store: &dyn DataStore, user_id: i32) -> Result<UserResponse, ApiError> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(UserResponse { user: user.into() })
}
