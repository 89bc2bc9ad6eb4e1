//! Tech Horizon Image Generation Service
//!
//! Provides text-to-image generation with support for:
//! - Gemini `generateContent` integration for production
//! - Mock image service for testing and development
//! - Quality tiers mapped to model identifiers and resolution hints

pub mod gemini;
pub mod mock;

use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Substring of the remote error raised when the selected key no longer resolves.
pub const CREDENTIAL_RESET_MARKER: &str = "Requested entity was not found";

/// Prefix of every image URI handed back to callers.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_FLASH_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_PRO_MODEL: &str = "gemini-3-pro-image-preview";

/// Resolution requested from the pro model.
pub const HIGH_QUALITY_IMAGE_SIZE: &str = "1K";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageGenError {
    #[error("Image generation configuration error: {0}")]
    Configuration(String),

    #[error("No image data returned from model")]
    NoImageReturned,

    #[error("API key reset required: the selected credential was not found")]
    CredentialResetRequired,

    /// Remote failure; the message is passed through verbatim.
    #[error("{0}")]
    RemoteGeneration(String),
}

impl ImageGenError {
    /// Classify a remote failure message, singling out the credential reset case.
    pub fn from_remote_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(CREDENTIAL_RESET_MARKER) {
            Self::CredentialResetRequired
        } else {
            Self::RemoteGeneration(message)
        }
    }
}

/// Image fidelity tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[default]
    Standard,
    High,
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Output aspect ratio accepted by the image models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to generate a single image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub quality: QualityTier,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::default(),
            quality: QualityTier::default(),
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_quality(mut self, quality: QualityTier) -> Self {
        self.quality = quality;
        self
    }
}

/// A displayable image reference (`data:image/png;base64,...`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub url: String,
}

impl ImagePayload {
    /// Wrap base64-encoded image bytes as a data URI
    pub fn from_base64(data: &str) -> Self {
        Self {
            url: format!("{}{}", DATA_URI_PREFIX, data),
        }
    }

    /// Decode the raw image bytes behind the data URI
    pub fn decode_bytes(&self) -> Result<Vec<u8>, ImageGenError> {
        decode_data_uri(&self.url)
    }
}

/// Decode the bytes of a `data:image/png;base64,` URI
pub fn decode_data_uri(url: &str) -> Result<Vec<u8>, ImageGenError> {
    let encoded = url.strip_prefix(DATA_URI_PREFIX).ok_or_else(|| {
        ImageGenError::RemoteGeneration("Image URI is not a base64 PNG data URI".to_string())
    })?;
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| ImageGenError::RemoteGeneration(format!("Invalid image data: {}", e)))
}

/// Image generation service configuration
#[derive(Clone)]
pub struct ImageGenConfig {
    /// Image provider (gemini, mock)
    pub provider: String,
    /// Key used for standard-tier requests
    pub api_key: String,
    /// Paid key used for high-tier requests, when configured
    pub pro_api_key: Option<String>,
    pub base_url: String,
    pub flash_model: String,
    pub pro_model: String,
}

impl std::fmt::Debug for ImageGenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGenConfig")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("pro_api_key", &self.pro_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("flash_model", &self.flash_model)
            .field("pro_model", &self.pro_model)
            .finish()
    }
}

impl Default for ImageGenConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            api_key: String::new(),
            pro_api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            flash_model: DEFAULT_FLASH_MODEL.to_string(),
            pro_model: DEFAULT_PRO_MODEL.to_string(),
        }
    }
}

impl ImageGenConfig {
    /// Create image generation config from environment variables
    pub fn from_env() -> Result<Self, ImageGenError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("IMAGE_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("VITE_GEMINI_API_KEY"))
            .unwrap_or_default();

        if provider == "gemini" && api_key.is_empty() {
            return Err(ImageGenError::Configuration(
                "GEMINI_API_KEY is required for Gemini provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            api_key,
            pro_api_key: std::env::var("GEMINI_PRO_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            flash_model: std::env::var("GEMINI_FLASH_MODEL")
                .unwrap_or_else(|_| DEFAULT_FLASH_MODEL.to_string()),
            pro_model: std::env::var("GEMINI_PRO_MODEL")
                .unwrap_or_else(|_| DEFAULT_PRO_MODEL.to_string()),
        })
    }

    /// Model identifier for a quality tier
    pub fn model_for(&self, quality: QualityTier) -> &str {
        match quality {
            QualityTier::Standard => &self.flash_model,
            QualityTier::High => &self.pro_model,
        }
    }
}

/// Image generation service trait for different backends
#[async_trait::async_trait]
pub trait ImageService: Send + Sync {
    /// Generate one image. Not retried, not cancellable once issued.
    async fn generate_image(&self, request: ImageRequest) -> Result<ImagePayload, ImageGenError>;
}

/// Factory for creating ImageService implementations
pub struct ImageServiceFactory;

impl ImageServiceFactory {
    pub fn create(config: ImageGenConfig) -> Result<Box<dyn ImageService>, ImageGenError> {
        match config.provider.as_str() {
            "gemini" => {
                tracing::info!("Creating Gemini image service");
                if config.api_key.is_empty() {
                    return Err(ImageGenError::Configuration(
                        "GEMINI_API_KEY is required for Gemini provider".to_string(),
                    ));
                }
                Ok(Box::new(gemini::GeminiImageService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock image service");
                Ok(Box::new(mock::MockImageService::new()))
            }
            provider => Err(ImageGenError::Configuration(format!(
                "Unknown image provider: {}. Supported providers: gemini, mock",
                provider
            ))),
        }
    }
}
