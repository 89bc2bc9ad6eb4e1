//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Provider-specific settings
//! (API keys, model identifiers) are loaded by the service crates themselves.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Image generation backend (gemini, mock)
    pub image_provider: String,

    /// Credential capability backend (local, mock)
    pub credential_provider: String,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got '{}'", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            image_provider: env::var("IMAGE_PROVIDER").unwrap_or_else(|_| "mock".to_string()),
            credential_provider: env::var("CREDENTIAL_PROVIDER")
                .unwrap_or_else(|_| "local".to_string()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "horizon=debug".to_string()),
            port,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_provider: "mock".to_string(),
            credential_provider: "local".to_string(),
            rust_log: "horizon=debug".to_string(),
            port: DEFAULT_PORT,
        }
    }
}
