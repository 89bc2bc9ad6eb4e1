//! Mock Image Service Implementation
//!
//! Programmable mock for testing generation workflows:
//! - `MockImageService`: configurable mock with request recording
//! - `MockImageBehavior`: controls outcome, delay, image data and error message
//! - `MockOutcome`: Image, NoImage, CredentialReset, or Fail

use crate::{ImageGenError, ImagePayload, ImageRequest, ImageService, CREDENTIAL_RESET_MARKER};
use std::sync::{Arc, Mutex, RwLock};

/// 1x1 transparent PNG, base64-encoded
pub const MOCK_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

const DEFAULT_ERROR_MESSAGE: &str = "Mock generation failure";

/// What outcome the mock should produce
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockOutcome {
    /// Return an inline image
    #[default]
    Image,
    /// Return a response without any inline image part
    NoImage,
    /// Fail with the remote "entity not found" message
    CredentialReset,
    /// Fail with the configured error message
    Fail,
}

/// Programmable behavior for the mock image service
#[derive(Debug, Clone)]
pub struct MockImageBehavior {
    pub outcome: Arc<RwLock<MockOutcome>>,
    pub delay_ms: Arc<RwLock<u64>>,
    pub image_base64: Arc<RwLock<String>>,
    pub error_message: Arc<RwLock<String>>,
}

impl Default for MockImageBehavior {
    fn default() -> Self {
        Self {
            outcome: Arc::new(RwLock::new(MockOutcome::Image)),
            delay_ms: Arc::new(RwLock::new(0)),
            image_base64: Arc::new(RwLock::new(MOCK_PNG_BASE64.to_string())),
            error_message: Arc::new(RwLock::new(DEFAULT_ERROR_MESSAGE.to_string())),
        }
    }
}

impl MockImageBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock outcome
    pub fn set_outcome(&self, outcome: MockOutcome) {
        *self.outcome.write().unwrap() = outcome;
    }

    /// Configure delay before the response
    pub fn set_delay_ms(&self, delay: u64) {
        *self.delay_ms.write().unwrap() = delay;
    }

    /// Configure the base64 payload returned for the Image outcome
    pub fn set_image_base64(&self, data: impl Into<String>) {
        *self.image_base64.write().unwrap() = data.into();
    }

    /// Configure the message returned for the Fail outcome
    pub fn set_error_message(&self, message: impl Into<String>) {
        *self.error_message.write().unwrap() = message.into();
    }

    /// Reset to default behavior
    pub fn reset(&self) {
        *self.outcome.write().unwrap() = MockOutcome::Image;
        *self.delay_ms.write().unwrap() = 0;
        *self.image_base64.write().unwrap() = MOCK_PNG_BASE64.to_string();
        *self.error_message.write().unwrap() = DEFAULT_ERROR_MESSAGE.to_string();
    }

    /// Read current outcome
    pub fn get_outcome(&self) -> MockOutcome {
        self.outcome.read().unwrap().clone()
    }

    /// Read current delay
    pub fn get_delay_ms(&self) -> u64 {
        *self.delay_ms.read().unwrap()
    }
}

/// Mock image service with programmable behavior
#[derive(Debug, Clone, Default)]
pub struct MockImageService {
    behavior: Arc<MockImageBehavior>,
    history: Arc<Mutex<Vec<ImageRequest>>>,
}

impl MockImageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: Arc<MockImageBehavior>) -> Self {
        Self {
            behavior,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the shared behavior for external configuration
    pub fn behavior(&self) -> &Arc<MockImageBehavior> {
        &self.behavior
    }

    /// Get recorded image requests
    pub fn recorded_requests(&self) -> Vec<ImageRequest> {
        self.history
            .lock()
            .expect("history lock poisoned")
            .clone()
    }

    /// Number of remote calls issued so far
    pub fn call_count(&self) -> usize {
        self.history
            .lock()
            .expect("history lock poisoned")
            .len()
    }

    /// Clear history
    pub fn reset_history(&self) {
        self.history
            .lock()
            .expect("history lock poisoned")
            .clear();
    }
}

#[async_trait::async_trait]
impl ImageService for MockImageService {
    async fn generate_image(&self, request: ImageRequest) -> Result<ImagePayload, ImageGenError> {
        tracing::info!(quality = %request.quality, "Mock image service: received request");

        self.history
            .lock()
            .map_err(|e| ImageGenError::RemoteGeneration(format!("history lock poisoned: {e}")))?
            .push(request);

        let outcome = self.behavior.get_outcome();
        let delay_ms = self.behavior.get_delay_ms();
        let image_base64 = self.behavior.image_base64.read().unwrap().clone();
        let error_message = self.behavior.error_message.read().unwrap().clone();

        if delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
        }

        match outcome {
            MockOutcome::Image => Ok(ImagePayload::from_base64(&image_base64)),
            MockOutcome::NoImage => Err(ImageGenError::NoImageReturned),
            MockOutcome::CredentialReset => Err(ImageGenError::from_remote_message(format!(
                "{}.",
                CREDENTIAL_RESET_MARKER
            ))),
            MockOutcome::Fail => Err(ImageGenError::from_remote_message(error_message)),
        }
    }
}
