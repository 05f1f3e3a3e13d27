use std::sync::Arc;

use super::backend::{GeminiBackend, GenerationBackend};
use super::prompts::{
    DESCRIPTION_PROMPT, capitalize_first, clean_description, item_image_prompt,
    styled_image_prompt,
};
use super::types::{GenerateContentRequest, GenerateContentResponse, Part};
use crate::config::Config;
use crate::error::{GenerationError, Result, StudioError, ValidationError};
use crate::image_ref::ImageRef;
use crate::store::ClothingItem;
use crate::{log_debug, log_error, log_info};

/// A clothing item produced by the service, not yet in the wardrobe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedItem {
    pub name: String,
    pub image: ImageRef,
}

/// High-level operations over the generation service
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    image_model: String,
    text_model: String,
}

impl GenerationClient {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        image_model: impl Into<String>,
        text_model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            image_model: image_model.into(),
            text_model: text_model.into(),
        }
    }

    /// Client talking to the real API with the configured models
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(GeminiBackend::new(config)),
            config.image_model.clone(),
            config.text_model.clone(),
        )
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    /// Dress the model in the given items
    pub async fn generate_styled_image(
        &self,
        model_image: &ImageRef,
        items: &[ClothingItem],
    ) -> Result<ImageRef> {
        if items.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }

        let mut parts = Vec::with_capacity(items.len() + 2);
        parts.push(Part::text(styled_image_prompt(items)));
        parts.push(Part::image(model_image));
        parts.extend(items.iter().map(|item| Part::image(&item.image)));

        log_info!("Requesting styled composite with {} items", items.len());
        let response = self
            .backend
            .generate_content(&self.image_model, &GenerateContentRequest::image(parts))
            .await?;

        extract_image(
            &response,
            "Failed to generate the styled image. The service returned no image.",
        )
    }

    /// Invent a clothing item, then draw it
    pub async fn generate_random_item(&self) -> Result<GeneratedItem> {
        let response = self
            .backend
            .generate_content(
                &self.text_model,
                &GenerateContentRequest::text(DESCRIPTION_PROMPT),
            )
            .await?;

        let description = clean_description(&response.text());
        if description.is_empty() {
            return Err(GenerationError::NoText.into());
        }
        log_debug!("Generated description: {}", description);

        self.render_item(&description, "Failed to generate clothing item image.")
            .await
    }

    /// Draw a clothing item from the caller's description
    pub async fn generate_described_item(&self, description: &str) -> Result<GeneratedItem> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription.into());
        }
        self.render_item(
            description,
            "Failed to generate clothing item image from description.",
        )
        .await
    }

    async fn render_item(
        &self,
        description: &str,
        no_image_message: &'static str,
    ) -> Result<GeneratedItem> {
        let request = GenerateContentRequest::image(vec![Part::text(item_image_prompt(description))]);
        let response = self
            .backend
            .generate_content(&self.image_model, &request)
            .await?;
        let image = extract_image(&response, no_image_message)?;

        Ok(GeneratedItem {
            name: capitalize_first(description),
            image,
        })
    }
}

fn extract_image(response: &GenerateContentResponse, no_image_message: &'static str) -> Result<ImageRef> {
    let inline = response
        .first_image()
        .ok_or(GenerationError::NoImage(no_image_message))?;
    ImageRef::try_from(inline).map_err(|e| {
        log_error!("Service returned an unusable image part: {}", e);
        StudioError::from(GenerationError::NoImage(no_image_message))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Replays canned responses and records what was asked
    struct ScriptedBackend {
        responses: Mutex<Vec<Result<GenerateContentResponse>>>,
        calls: Mutex<Vec<(String, GenerateContentRequest)>>,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<Result<GenerateContentResponse>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn generate_content(
            &self,
            model: &str,
            request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse> {
            self.calls.lock().push((model.to_string(), request.clone()));
            self.responses
                .lock()
                .pop()
                .unwrap_or_else(|| Ok(GenerateContentResponse::default()))
        }
    }

    fn png() -> ImageRef {
        ImageRef::from_bytes("image/png", b"\x89PNG\r\n\x1a\nrest")
    }

    #[tokio::test]
    async fn test_random_item_uses_text_then_image_model() {
        let backend = ScriptedBackend::new(vec![
            Ok(GenerateContentResponse::from_parts(vec![Part::text(
                "\"a black leather biker jacket\"",
            )])),
            Ok(GenerateContentResponse::from_parts(vec![Part::image(&png())])),
        ]);
        let client = GenerationClient::new(backend.clone(), "img-model", "text-model");

        let item = client.generate_random_item().await.expect("item");
        assert_eq!(item.name, "A black leather biker jacket");
        assert_eq!(item.image, png());

        let calls = backend.calls.lock();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "text-model");
        assert_eq!(calls[1].0, "img-model");
        assert!(calls[1].1.generation_config.is_some());
    }

    #[tokio::test]
    async fn test_random_item_without_text_fails() {
        let backend = ScriptedBackend::new(vec![Ok(GenerateContentResponse::default())]);
        let client = GenerationClient::new(backend.clone(), "img", "text");

        let err = client.generate_random_item().await.expect_err("no text");
        assert!(matches!(err, StudioError::Generation(GenerationError::NoText)));
        assert_eq!(backend.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_styled_image_sends_model_then_items() {
        let backend =
            ScriptedBackend::new(vec![Ok(GenerateContentResponse::from_parts(vec![
                Part::text("done"),
                Part::image(&png()),
            ]))]);
        let client = GenerationClient::new(backend.clone(), "img", "text");
        let model = ImageRef::from_bytes("image/jpeg", b"\xFF\xD8\xFFmodel");
        let items = vec![ClothingItem {
            id: crate::store::WardrobeStore::new().add_generated("scarf", png()),
            name: "scarf".into(),
            image: png(),
        }];

        let result = client
            .generate_styled_image(&model, &items)
            .await
            .expect("composite");
        assert_eq!(result, png());

        let calls = backend.calls.lock();
        let parts = &calls[0].1.contents[0].parts;
        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[0], Part::Text(t) if t.contains("scarf")));
        assert!(matches!(&parts[1], Part::InlineData(d) if d.mime_type == "image/jpeg"));
        assert!(matches!(&parts[2], Part::InlineData(d) if d.mime_type == "image/png"));
    }

    #[tokio::test]
    async fn test_backend_errors_pass_through() {
        let backend = ScriptedBackend::new(vec![Err(GenerationError::InvalidRequest.into())]);
        let client = GenerationClient::new(backend, "img", "text");

        let err = client
            .generate_described_item("a wool coat")
            .await
            .expect_err("invalid");
        assert!(matches!(
            err,
            StudioError::Generation(GenerationError::InvalidRequest)
        ));
    }
}
