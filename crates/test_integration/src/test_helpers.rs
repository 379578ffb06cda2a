use crate::runner::context::stub_identity::token_for;
use crate::runner::context::test_context::TestContext;
use color_eyre::Result;
use color_eyre::eyre::{ContextCompat, eyre};
use common_services::api::auth::interfaces::AuthResponse;
use common_services::api::photos::interfaces::{CreatePhotoResponse, PhotoDetailResponse};
use common_services::database::DataStore;
use common_services::database::app_user::{UserProfile, UserRole};
use reqwest::StatusCode;
use serde_json::{Value, json};

/// Sign in through the api as `subject`, creating the user on first use.
pub async fn sign_in(context: &TestContext, subject: &str) -> Result<UserProfile> {
    let response = context
        .http_client
        .post(context.url("/auth/google"))
        .json(&json!({ "token": token_for(subject) }))
        .send()
        .await?;
    if response.status() != StatusCode::OK {
        return Err(eyre!("Sign in failed with {}", response.status()));
    }
    let auth: AuthResponse = response.json().await?;
    Ok(auth.user)
}

/// Sign in and obtain creator access through the api.
pub async fn creator(context: &TestContext, subject: &str) -> Result<i32> {
    let user = sign_in(context, subject).await?;
    let response = context
        .http_client
        .post(context.url("/users/request-creator"))
        .json(&json!({ "userId": user.user_id, "reason": "integration test" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(user.user_id)
}

/// There is no api to create the first admin, so this goes through the store.
pub async fn admin(context: &TestContext, subject: &str) -> Result<i32> {
    let user = sign_in(context, subject).await?;
    context
        .store
        .set_user_role(user.user_id, UserRole::Admin)
        .await?
        .wrap_err("admin user vanished")?;
    Ok(user.user_id)
}

pub async fn upload_photo(context: &TestContext, user_id: i32, title: &str) -> Result<String> {
    let response = context
        .http_client
        .post(context.url("/photos/upload"))
        .json(&json!({
            "userId": user_id,
            "title": title,
            "imageUrl": format!("https://cdn.example.com/{title}.jpg"),
            "caption": format!("Caption of {title}"),
            "location": "Utrecht",
        }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: CreatePhotoResponse = response.json().await?;
    Ok(created.photo_id)
}

pub async fn photo_detail(context: &TestContext, photo_id: &str) -> Result<PhotoDetailResponse> {
    let response = context
        .http_client
        .get(context.url(&format!("/photos/{photo_id}")))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(response.json().await?)
}

/// Status and parsed json body of a response.
pub async fn status_and_json(response: reqwest::Response) -> Result<(StatusCode, Value)> {
    let status = response.status();
    let body = response.json::<Value>().await?;
    Ok((status, body))
}
