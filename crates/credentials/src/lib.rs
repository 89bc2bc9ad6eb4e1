//! Tech Horizon Credential Capability
//!
//! The hosting environment decides whether a paid API key has been selected
//! and owns the interactive selection flow. This crate models that capability:
//! - `CredentialProvider` trait with the two host operations
//! - Local provider backed by a configured paid key
//! - Mock provider with programmable selection state for tests

pub mod local;
pub mod mock;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CredentialError {
    #[error("Credential configuration error: {0}")]
    Configuration(String),

    #[error("Credential selection failed: {0}")]
    SelectionFailed(String),
}

/// Credential provider configuration
#[derive(Debug, Clone)]
pub struct CredentialConfig {
    /// Credential provider (local, mock)
    pub provider: String,
    /// Whether a paid key is available for selection
    pub paid_key_available: bool,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            provider: "local".to_string(),
            paid_key_available: false,
        }
    }
}

impl CredentialConfig {
    /// Create credential config from environment variables
    pub fn from_env() -> Result<Self, CredentialError> {
        dotenvy::dotenv().ok();

        let provider =
            std::env::var("CREDENTIAL_PROVIDER").unwrap_or_else(|_| "local".to_string());
        let paid_key_available = std::env::var("GEMINI_PRO_API_KEY")
            .map(|key| !key.is_empty())
            .unwrap_or(false);

        Ok(Self {
            provider,
            paid_key_available,
        })
    }
}

/// Host-provided credential capability
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Has a paid credential currently been selected?
    async fn has_selected_credential(&self) -> bool;

    /// Run the interactive selection flow.
    async fn open_select_credential(&self) -> Result<(), CredentialError>;
}

/// Factory for creating CredentialProvider implementations
pub struct CredentialProviderFactory;

impl CredentialProviderFactory {
    pub fn create(config: CredentialConfig) -> Result<Box<dyn CredentialProvider>, CredentialError> {
        match config.provider.as_str() {
            "local" => {
                tracing::info!(
                    paid_key_available = config.paid_key_available,
                    "Creating local credential provider"
                );
                Ok(Box::new(local::LocalCredentialProvider::new(
                    config.paid_key_available,
                )))
            }
            "mock" => {
                tracing::info!("Creating mock credential provider");
                Ok(Box::new(mock::MockCredentialProvider::new()))
            }
            provider => Err(CredentialError::Configuration(format!(
                "Unknown credential provider: {}. Supported providers: local, mock",
                provider
            ))),
        }
    }
}
