//! Gemini Image Generation Implementation
//!
//! Calls the Gemini `generateContent` endpoint
//! (`{base_url}/v1beta/models/{model}:generateContent`) using reqwest.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    ImageGenConfig, ImageGenError, ImagePayload, ImageRequest, ImageService, QualityTier,
    HIGH_QUALITY_IMAGE_SIZE,
};

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_size: Option<&'static str>,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

/// Gemini API error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Gemini image service implementation
pub struct GeminiImageService {
    client: Client,
    config: ImageGenConfig,
}

impl GeminiImageService {
    /// Create a new Gemini image service
    pub fn new(config: ImageGenConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// High tier authenticates with the paid key when one is configured.
    fn api_key_for(&self, quality: QualityTier) -> &str {
        match (quality, &self.config.pro_api_key) {
            (QualityTier::High, Some(key)) => key.as_str(),
            _ => self.config.api_key.as_str(),
        }
    }
}

/// First part carrying inline image bytes wins; later parts are ignored.
fn extract_image(response: GenerateContentResponse) -> Result<ImagePayload, ImageGenError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .into_iter()
        .flat_map(|content| content.parts)
        .find_map(|part| part.inline_data)
        .map(|inline| ImagePayload::from_base64(&inline.data))
        .ok_or(ImageGenError::NoImageReturned)
}

#[async_trait::async_trait]
impl ImageService for GeminiImageService {
    async fn generate_image(&self, request: ImageRequest) -> Result<ImagePayload, ImageGenError> {
        let model = self.config.model_for(request.quality);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                image_config: ImageConfig {
                    aspect_ratio: request.aspect_ratio.as_str(),
                    image_size: match request.quality {
                        QualityTier::High => Some(HIGH_QUALITY_IMAGE_SIZE),
                        QualityTier::Standard => None,
                    },
                },
            },
        };

        tracing::debug!(
            model = %model,
            aspect_ratio = %request.aspect_ratio,
            quality = %request.quality,
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key_for(request.quality))
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageGenError::from_remote_message(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            let message = match serde_json::from_str::<ErrorResponse>(&error_body) {
                Ok(error_response) => error_response.error.message,
                Err(_) => format!("Gemini API returned {}: {}", status, error_body),
            };

            tracing::warn!(status = %status, model = %model, "Gemini generateContent failed");
            return Err(ImageGenError::from_remote_message(message));
        }

        let api_response: GenerateContentResponse = response.json().await.map_err(|e| {
            ImageGenError::RemoteGeneration(format!("Failed to parse response: {}", e))
        })?;

        extract_image(api_response)
    }
}
