//! Wire types for the Gemini `generateContent` endpoint
//!
//! Only the fields the studio reads or writes are modelled. Unknown response
//! fields are ignored.

use serde::{Deserialize, Serialize};

use crate::image_ref::{ImageRef, ImageRefError};

/// Inline binary payload (base64 in JSON)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl From<&ImageRef> for InlineData {
    fn from(image: &ImageRef) -> Self {
        Self {
            mime_type: image.mime().to_string(),
            data: image.payload().to_string(),
        }
    }
}

impl TryFrom<&InlineData> for ImageRef {
    type Error = ImageRefError;

    fn try_from(inline: &InlineData) -> Result<Self, Self::Error> {
        ImageRef::from_base64(inline.mime_type.clone(), inline.data.clone())
    }
}

/// One piece of content: either text or an inline image
///
/// Serializes as `{"text": ...}` or `{"inlineData": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawPart")]
pub enum Part {
    Text(String),
    InlineData(InlineData),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn image(image: &ImageRef) -> Self {
        Self::InlineData(image.into())
    }
}

// Response parts may carry extra keys (thought signatures and the like) next to
// the payload, which an externally tagged enum refuses. Read them loosely and
// fold into the two cases.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

impl From<RawPart> for Part {
    fn from(raw: RawPart) -> Self {
        match raw.inline_data {
            Some(inline) => Self::InlineData(inline),
            None => Self::Text(raw.text.unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Text,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_modalities: Vec<Modality>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A plain text prompt answered with text
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            generation_config: None,
        }
    }

    /// A multimodal prompt whose answer must be an image
    pub fn image(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content::user(parts)],
            generation_config: Some(GenerationConfig {
                response_modalities: vec![Modality::Image],
            }),
        }
    }

    /// Number of inline images attached to the request
    pub fn image_count(&self) -> usize {
        self.contents
            .iter()
            .flat_map(|c| &c.parts)
            .filter(|p| matches!(p, Part::InlineData(_)))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Response with a single candidate holding the given parts
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts,
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
        }
    }

    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// The first part of the first candidate that carries inline image data
    pub fn first_image(&self) -> Option<&InlineData> {
        self.first_parts().iter().find_map(|part| match part {
            Part::InlineData(inline) => Some(inline),
            Part::Text(_) => None,
        })
    }

    /// All text parts of the first candidate, concatenated
    pub fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter_map(|part| match part {
                Part::Text(text) => Some(text.as_str()),
                Part::InlineData(_) => None,
            })
            .collect()
    }
}

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
