//! Application configuration loaded from environment variables.
//!
//! All configuration is read once at startup. The completion API key is
//! intentionally optional here: its absence is reported per-request by the
//! generation endpoint rather than preventing startup.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// Stripe webhook signing secret (for payment confirmation events)
    pub stripe_webhook_secret: String,
    /// Completion API key (OpenRouter); checked at generation time
    pub openrouter_api_key: Option<String>,
    /// Completion API base URL (OpenAI-compatible)
    pub openrouter_endpoint: String,
    /// Frontend URL for CORS and checkout redirects
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            stripe_secret_key: env::var("STRIPE_SECRET_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRIPE_SECRET_KEY"))?,
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRIPE_WEBHOOK_SECRET"))?,
            openrouter_api_key: env::var("OPENROUTER_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            openrouter_endpoint: env::var("OPENROUTER_ENDPOINT")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Default config for testing only. No completion API key so that
    /// generation tests exercise the configuration-error path offline.
    pub fn test_default() -> Self {
        Self {
            stripe_secret_key: "sk_test_123".to_string(),
            stripe_webhook_secret: "whsec_test_secret".to_string(),
            openrouter_api_key: None,
            openrouter_endpoint: "http://localhost:9999/api/v1".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
