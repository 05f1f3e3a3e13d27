use std::sync::Arc;

use tryon_studio::gemini::types::{GenerateContentRequest, GenerateContentResponse, Part};
use tryon_studio::gemini::{GeminiBackend, GenerationBackend, GenerationClient};
use tryon_studio::{Config, GenerationError, ImageRef, StudioError};

#[path = "test_utils.rs"]
mod test_utils;
use test_utils::{OneShotServer, StubBackend, png_bytes};

fn png() -> ImageRef {
    ImageRef::from_bytes("image/png", &png_bytes())
}

fn config_for(base_url: &str) -> Config {
    Config {
        api_base_url: base_url.to_string(),
        request_timeout_secs: 10,
        ..Config::default()
    }
}

#[tokio::test]
async fn test_described_item_is_named_after_description() {
    let backend = StubBackend::new(vec![Ok(GenerateContentResponse::from_parts(vec![
        Part::image(&png()),
    ]))]);
    let client = GenerationClient::new(backend.clone(), "image-model", "text-model");

    let item = client
        .generate_described_item("  a red silk dress ")
        .await
        .expect("Failed to generate item");

    assert_eq!(item.name, "A red silk dress");
    assert_eq!(item.image, png());
    assert_eq!(backend.call_count(), 1);

    let requests = backend.requests.lock();
    assert_eq!(requests[0].0, "image-model");
    assert!(matches!(
        &requests[0].1.contents[0].parts[0],
        Part::Text(prompt) if prompt.contains("a red silk dress")
    ));
}

#[tokio::test]
async fn test_text_only_response_is_an_error() {
    let backend = StubBackend::new(vec![Ok(GenerateContentResponse::from_parts(vec![
        Part::text("I can't draw that."),
    ]))]);
    let client = GenerationClient::new(backend, "image-model", "text-model");

    let err = client
        .generate_described_item("a wool coat")
        .await
        .expect_err("Text-only response must fail");
    assert!(matches!(
        err,
        StudioError::Generation(GenerationError::NoImage(_))
    ));
}

#[tokio::test]
async fn test_blank_description_never_calls_service() {
    let backend = StubBackend::new(Vec::new());
    let client = GenerationClient::new(backend.clone(), "image-model", "text-model");

    let err = client
        .generate_described_item("   ")
        .await
        .expect_err("Blank description must fail");
    assert_eq!(err.to_string(), "Please enter a description for the clothing item.");
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_missing_key_fails_before_network() {
    let server = OneShotServer::start(200, "{}".to_string()).await;
    let backend = GeminiBackend::with_credential(&config_for(&server.base_url), None);
    assert!(!backend.has_credential());

    let err = backend
        .generate_content("image-model", &GenerateContentRequest::text("hello"))
        .await
        .expect_err("No credential must fail");

    assert!(matches!(err, StudioError::Configuration(_)));
    assert!(err.to_string().contains("API key"));
    assert_eq!(server.connection_count(), 0);
    server.stop();
}

#[tokio::test]
async fn test_blank_key_counts_as_missing() {
    let backend = GeminiBackend::with_credential(&Config::default(), Some("  ".to_string()));
    assert!(!backend.has_credential());
}

#[tokio::test]
async fn test_bad_request_maps_to_invalid_request() {
    let body = r#"{"error":{"code":400,"message":"Unable to process input image.","status":"INVALID_ARGUMENT"}}"#;
    let server = OneShotServer::start(400, body.to_string()).await;
    let backend =
        GeminiBackend::with_credential(&config_for(&server.base_url), Some("test-key".into()));

    let err = backend
        .generate_content("image-model", &GenerateContentRequest::text("hello"))
        .await
        .expect_err("400 must fail");

    assert!(matches!(
        err,
        StudioError::Generation(GenerationError::InvalidRequest)
    ));
    assert!(err.to_string().starts_with("The request was invalid"));
}

#[tokio::test]
async fn test_styled_image_over_http() {
    let composite = png();
    let body = serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "Here you go." },
                    { "inlineData": { "mimeType": "image/png", "data": composite.payload() } }
                ]
            },
            "finishReason": "STOP"
        }]
    });
    let server = OneShotServer::start(200, body.to_string()).await;
    let config = config_for(&server.base_url);
    let backend = GeminiBackend::with_credential(&config, Some("test-key".into()));
    let client = GenerationClient::new(Arc::new(backend), "image-model", "text-model");

    let mut wardrobe = tryon_studio::WardrobeStore::new();
    let id = wardrobe.add_generated("Denim jacket", png());
    let items = vec![wardrobe.get(id).expect("item").clone()];
    let model = ImageRef::from_bytes("image/jpeg", &test_utils::jpeg_bytes());

    let result = client
        .generate_styled_image(&model, &items)
        .await
        .expect("Failed to generate composite");
    assert_eq!(result, composite);

    let request = server.received().await;
    let lower = request.to_lowercase();
    assert!(request.starts_with("POST /models/image-model:generateContent"));
    assert!(lower.contains("x-goog-api-key: test-key"));
    assert!(request.contains("\"inlineData\""));
    assert!(request.contains("Denim jacket"));
}
