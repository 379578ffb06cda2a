use crate::runner::context::test_context::TestContext;
use crate::test_helpers::status_and_json;
use color_eyre::Result;
use common_services::api::storage::interfaces::UploadFileResponse;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![7_u8; len];
    bytes[..PNG_SIGNATURE.len()].copy_from_slice(&PNG_SIGNATURE);
    bytes
}

fn file_form(bytes: Vec<u8>, file_name: &str, mime: &str) -> Result<Form> {
    let part = Part::bytes(bytes)
        .file_name(file_name.to_owned())
        .mime_str(mime)?;
    Ok(Form::new().text("note", "ignored").part("file", part))
}

async fn upload(context: &TestContext, form: Form) -> Result<reqwest::Response> {
    Ok(context
        .http_client
        .post(context.url("/storage/upload"))
        .multipart(form)
        .send()
        .await?)
}

pub async fn test_upload_png(context: &TestContext) -> Result<()> {
    // ARRANGE
    let bytes = png_bytes(2 * 1024 * 1024);

    // ACT
    let response = upload(context, file_form(bytes.clone(), "Holiday.PNG", "image/png")?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let uploaded: UploadFileResponse = response.json().await?;

    // ASSERT
    assert_eq!(uploaded.message, "File uploaded successfully");
    assert!(uploaded.file_name.ends_with(".png"));
    assert!(uploaded.image_url.ends_with(&uploaded.file_name));
    assert!(context.blob_dir().join(&uploaded.file_name).exists());

    let served = context.http_client.get(&uploaded.image_url).send().await?;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await?.len(), bytes.len());
    Ok(())
}

pub async fn test_upload_gif(context: &TestContext) -> Result<()> {
    let response = upload(context, file_form(b"GIF89a".to_vec(), "x.gif", "image/gif")?).await?;
    let (status, body) = status_and_json(response).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Invalid file type. Only JPEG, PNG, and WebP are allowed."
    );
    Ok(())
}

pub async fn test_upload_oversize(context: &TestContext) -> Result<()> {
    let bytes = png_bytes(15 * 1024 * 1024);
    let response = upload(context, file_form(bytes, "big.png", "image/png")?).await?;
    let (status, body) = status_and_json(response).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "File size exceeds 10MB limit");

    // --- Over the request body cap ---
    let bytes = png_bytes(60 * 1024 * 1024);
    let response = upload(context, file_form(bytes, "huge.png", "image/png")?).await?;
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let (status, body) = status_and_json(response).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(content_type.starts_with("application/json"));
    assert_eq!(body["error"], "File size exceeds 10MB limit");

    // --- Empty file ---
    let response = upload(context, file_form(Vec::new(), "empty.png", "image/png")?).await?;
    let (status, body) = status_and_json(response).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Uploaded file is empty");
    Ok(())
}

pub async fn test_upload_not_multipart(context: &TestContext) -> Result<()> {
    let response = context
        .http_client
        .post(context.url("/storage/upload"))
        .json(&serde_json::json!({ "file": "not really" }))
        .send()
        .await?;
    let (status, body) = status_and_json(response).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    Ok(())
}

pub async fn test_upload_without_file(context: &TestContext) -> Result<()> {
    let form = Form::new().text("title", "no file here");
    let response = upload(context, form).await?;
    let (status, body) = status_and_json(response).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");
    Ok(())
}

pub async fn test_delete_file(context: &TestContext) -> Result<()> {
    let response = upload(context, file_form(png_bytes(64), "small.png", "image/png")?).await?;
    let uploaded: UploadFileResponse = response.json().await?;
    let url = context.url(&format!("/storage/{}", uploaded.file_name));

    // --- Delete ---
    let response = context.http_client.delete(&url).send().await?;
    let (status, body) = status_and_json(response).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
    assert_eq!(body["message"], "File deleted successfully");
    assert!(!context.blob_dir().join(&uploaded.file_name).exists());

    // --- Already gone ---
    let response = context.http_client.delete(&url).send().await?;
    let (status, body) = status_and_json(response).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], false);
    assert_eq!(body["message"], "File not found");

    // --- Not a key ---
    let response = context
        .http_client
        .delete(context.url("/storage/..secret"))
        .send()
        .await?;
    let (status, body) = status_and_json(response).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid file name");
    Ok(())
}
